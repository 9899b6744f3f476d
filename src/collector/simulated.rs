// Offline counter source: monotonically growing random counters for development runs.
// Equipment without interfaces gets 12 generated ports, mirroring a small access switch.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use rand::Rng;

use super::{CounterSource, RawInterfaceCounters};
use crate::models::{Equipment, InterfaceStatus};

const GENERATED_INTERFACES: u32 = 12;

const PORT_KINDS: [(&str, u64); 4] = [
    ("GigabitEthernet", 1_000_000_000),
    ("TenGigabitEthernet", 10_000_000_000),
    ("FastEthernet", 100_000_000),
    ("Serial", 2_048_000),
];

#[derive(Debug, Clone)]
struct SimPort {
    name: String,
    description: String,
    speed_bps: u64,
    oper_status: InterfaceStatus,
    in_octets: u64,
    out_octets: u64,
}

pub struct SimulatedSource {
    interval_secs: f64,
    /// Load ceiling as a fraction of link speed (0..=1).
    max_load: f64,
    ports: Mutex<HashMap<(u64, u32), SimPort>>,
}

impl SimulatedSource {
    /// `interval_secs` sizes counter increments so interval utilization stays within `max_load`.
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval_secs: interval_secs.max(1.0),
            max_load: 0.95,
            ports: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_max_load(mut self, max_load: f64) -> Self {
        self.max_load = max_load.clamp(0.0, 1.0);
        self
    }

    fn seed_ports(equipment: &Equipment, rng: &mut impl Rng) -> Vec<(u32, SimPort)> {
        if equipment.interfaces.is_empty() {
            return (1..=GENERATED_INTERFACES)
                .map(|if_index| {
                    let (kind, speed) = PORT_KINDS[rng.random_range(0..PORT_KINDS.len())];
                    let oper_status = match rng.random_range(0..3) {
                        0 => InterfaceStatus::Up,
                        1 => InterfaceStatus::Down,
                        _ => InterfaceStatus::AdminDown,
                    };
                    let port = SimPort {
                        name: format!("{kind}0/{if_index}"),
                        description: format!("Interface {kind} {if_index}"),
                        speed_bps: speed,
                        oper_status,
                        in_octets: rng.random_range(1_000_000..100_000_000),
                        out_octets: rng.random_range(1_000_000..100_000_000),
                    };
                    (if_index, port)
                })
                .collect();
        }
        equipment
            .interfaces
            .iter()
            .map(|i| {
                let oper_status = match i.oper_status {
                    InterfaceStatus::Unknown => InterfaceStatus::Up,
                    s => s,
                };
                let port = SimPort {
                    name: i.name.clone(),
                    description: i.description.clone(),
                    speed_bps: i.speed_bps,
                    oper_status,
                    in_octets: i.in_octets,
                    out_octets: i.out_octets,
                };
                (i.if_index, port)
            })
            .collect()
    }

    fn advance(&self, equipment: &Equipment) -> anyhow::Result<Vec<RawInterfaceCounters>> {
        let mut rng = rand::rng();
        let mut ports = self
            .ports
            .lock()
            .map_err(|_| anyhow::anyhow!("simulated port state poisoned"))?;
        if !ports.keys().any(|(id, _)| *id == equipment.id) {
            for (if_index, port) in Self::seed_ports(equipment, &mut rng) {
                ports.insert((equipment.id, if_index), port);
            }
        }

        let now = Utc::now();
        let mut out: Vec<RawInterfaceCounters> = ports
            .iter_mut()
            .filter(|((id, _), _)| *id == equipment.id)
            .map(|((_, if_index), port)| {
                if port.oper_status == InterfaceStatus::Up {
                    let capacity = port.speed_bps as f64 / 8.0 * self.interval_secs;
                    let mut step = || (capacity * rng.random_range(0.0..=self.max_load)) as u64;
                    port.in_octets = port.in_octets.wrapping_add(step());
                    port.out_octets = port.out_octets.wrapping_add(step());
                }
                RawInterfaceCounters {
                    if_index: *if_index,
                    name: port.name.clone(),
                    description: port.description.clone(),
                    speed_bps: port.speed_bps,
                    oper_status: port.oper_status,
                    admin_status: InterfaceStatus::Up,
                    in_octets: port.in_octets,
                    out_octets: port.out_octets,
                    sample_timestamp: now,
                }
            })
            .collect();
        out.sort_by_key(|c| c.if_index);
        Ok(out)
    }
}

impl CounterSource for SimulatedSource {
    async fn poll(&self, equipment: &Equipment) -> anyhow::Result<Vec<RawInterfaceCounters>> {
        self.advance(equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquipmentType, NetworkDomain};

    #[test]
    fn generates_twelve_ports_for_bare_equipment() {
        let source = SimulatedSource::new(300.0);
        let e = Equipment::new(1, "sw-1", EquipmentType::Switch, NetworkDomain::Lan);
        let first = source.advance(&e).unwrap();
        assert_eq!(first.len(), 12);
        assert_eq!(first[0].if_index, 1);
        let second = source.advance(&e).unwrap();
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.name, b.name);
            assert!(b.in_octets >= a.in_octets);
        }
    }
}
