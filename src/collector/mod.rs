// Counter collection: polls every equipment through a CounterSource with bounded concurrency
// and a per-device timeout, then turns counter readings into utilization percentages.

mod simulated;

pub use simulated::SimulatedSource;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, warn};

use crate::models::{Equipment, Interface, InterfaceStatus};
use crate::utilization::{calculate_interface_utilization, counter_delta};

/// One interface reading as delivered by a counter source (SNMP agent, simulator, fixture).
#[derive(Debug, Clone, PartialEq)]
pub struct RawInterfaceCounters {
    pub if_index: u32,
    pub name: String,
    pub description: String,
    pub speed_bps: u64,
    pub oper_status: InterfaceStatus,
    pub admin_status: InterfaceStatus,
    /// Cumulative octet counters.
    pub in_octets: u64,
    pub out_octets: u64,
    pub sample_timestamp: DateTime<Utc>,
}

/// Where interface counters come from. Implementations may block on I/O; the collector
/// bounds each call with a timeout.
pub trait CounterSource: Send + Sync + 'static {
    fn poll(
        &self,
        equipment: &Equipment,
    ) -> impl Future<Output = anyhow::Result<Vec<RawInterfaceCounters>>> + Send;
}

#[derive(Debug, Clone, Copy)]
pub struct CollectorConfig {
    pub max_concurrency: usize,
    pub device_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            device_timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CounterReading {
    in_octets: u64,
    out_octets: u64,
    at: DateTime<Utc>,
}

/// Previous counter readings per (equipment id, ifIndex), used for interval utilization.
#[derive(Debug, Default)]
pub struct CounterCache {
    readings: HashMap<(u64, u32), CounterReading>,
}

impl CounterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Utilization for a new reading, then remembers it. Device counters are lifetime totals, so
    /// the first reading of an interface only sets the baseline and yields `None`.
    fn observe(&mut self, equipment_id: u64, c: &RawInterfaceCounters) -> Option<(f64, f64)> {
        let key = (equipment_id, c.if_index);
        let current = CounterReading {
            in_octets: c.in_octets,
            out_octets: c.out_octets,
            at: c.sample_timestamp,
        };
        let utilization = self.readings.get(&key).map(|prev| {
            let elapsed = (current.at - prev.at).num_milliseconds() as f64 / 1000.0;
            calculate_interface_utilization(
                counter_delta(prev.in_octets, current.in_octets),
                counter_delta(prev.out_octets, current.out_octets),
                c.speed_bps,
                elapsed,
            )
        });
        self.readings.insert(key, current);
        utilization
    }
}

/// Result of one collection pass over the inventory.
#[derive(Debug, Clone)]
pub struct CollectOutcome {
    /// Same order as the input; failed devices keep their previous interfaces.
    pub equipment: Vec<Equipment>,
    /// Ids of devices that answered in time.
    pub polled: Vec<u64>,
    /// ifIndex values, per polled device, that had a previous reading and so carry a real
    /// interval measurement. Interfaces seen for the first time are absent.
    pub measured: HashMap<u64, Vec<u32>>,
    pub failed: usize,
}

/// Polls every equipment at most `max_concurrency` at a time. A device that errors or exceeds
/// `device_timeout` is logged and left unchanged; the others are unaffected.
pub async fn collect_cycle<S: CounterSource>(
    source: &Arc<S>,
    equipment: Vec<Equipment>,
    cache: &mut CounterCache,
    config: CollectorConfig,
) -> CollectOutcome {
    let timeout = config.device_timeout;
    let results: Vec<(usize, anyhow::Result<Vec<RawInterfaceCounters>>)> =
        stream::iter(equipment.iter().cloned().enumerate())
            .map(|(idx, e)| {
                let source = Arc::clone(source);
                async move {
                    let result = match tokio::time::timeout(timeout, source.poll(&e)).await {
                        Ok(r) => r,
                        Err(_) => Err(anyhow::anyhow!(
                            "no answer within {} ms",
                            timeout.as_millis()
                        )),
                    };
                    (idx, result)
                }
            })
            .buffer_unordered(config.max_concurrency.max(1))
            .collect()
            .await;

    let mut equipment = equipment;
    let mut polled = Vec::with_capacity(results.len());
    let mut measured = HashMap::new();
    let mut failed = 0;
    for (idx, result) in results {
        let Some(e) = equipment.get_mut(idx) else {
            continue;
        };
        match result {
            Ok(counters) => {
                let with_interval = apply_counters(e, &counters, cache);
                if !with_interval.is_empty() {
                    measured.insert(e.id, with_interval);
                }
                polled.push(e.id);
            }
            Err(err) => {
                failed += 1;
                warn!(
                    error = %err,
                    equipment_id = e.id,
                    equipment = %e.name,
                    operation = "poll_equipment",
                    "collection failed; keeping previous values"
                );
            }
        }
    }
    polled.sort_unstable();
    debug!(
        polled = polled.len(),
        failed,
        operation = "collect_cycle",
        "collection cycle complete"
    );
    CollectOutcome {
        equipment,
        polled,
        measured,
        failed,
    }
}

/// Replaces the interfaces of `equipment` with the polled readings, in source order.
/// First readings report 0%. Returns the ifIndex values that got an interval measurement.
fn apply_counters(
    equipment: &mut Equipment,
    counters: &[RawInterfaceCounters],
    cache: &mut CounterCache,
) -> Vec<u32> {
    let id = equipment.id;
    let mut with_interval = Vec::new();
    equipment.interfaces = counters
        .iter()
        .map(|c| {
            let mut iface = Interface::new(c.if_index, c.name.clone(), c.speed_bps);
            iface.description = c.description.clone();
            iface.oper_status = c.oper_status;
            iface.admin_status = c.admin_status;
            iface.in_octets = c.in_octets;
            iface.out_octets = c.out_octets;
            match cache.observe(id, c) {
                Some(utilization) => {
                    iface.apply_utilization(utilization);
                    with_interval.push(c.if_index);
                }
                None => iface.apply_utilization((0.0, 0.0)),
            }
            iface.last_updated = Some(c.sample_timestamp);
            iface
        })
        .collect();
    with_interval
}

/// IF-MIB ifOperStatus / ifAdminStatus code to status.
pub fn map_snmp_status(code: i64) -> InterfaceStatus {
    match code {
        1 => InterfaceStatus::Up,
        2 => InterfaceStatus::Down,
        3 => InterfaceStatus::Testing,
        7 => InterfaceStatus::AdminDown,
        // unknown(4), dormant(5), notPresent(6) and anything else
        _ => InterfaceStatus::Unknown,
    }
}

/// Nominal speed in bps: ifHighSpeed (Mbps) when non-zero, since ifSpeed saturates at 2^32-1.
pub fn effective_speed(if_speed: u64, if_high_speed: u64) -> u64 {
    if if_high_speed > 0 {
        if_high_speed.saturating_mul(1_000_000)
    } else {
        if_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(in_octets: u64, out_octets: u64, at: DateTime<Utc>) -> RawInterfaceCounters {
        RawInterfaceCounters {
            if_index: 1,
            name: "Gi0/1".into(),
            description: String::new(),
            speed_bps: 1_000_000,
            oper_status: InterfaceStatus::Up,
            admin_status: InterfaceStatus::Up,
            in_octets,
            out_octets,
            sample_timestamp: at,
        }
    }

    #[test]
    fn cache_uses_delta_after_first_reading() {
        let t0 = Utc::now();
        let t1 = t0 + chrono::Duration::seconds(10);
        let mut cache = CounterCache::new();
        // lifetime totals far beyond one interval: baseline only
        assert_eq!(cache.observe(7, &reading(7_000_000_000_000, 0, t0)), None);
        // 12_500 octets over 10 s on 1 Mbps = 10 kbps = 1%
        let (i, o) = cache.observe(7, &reading(7_000_000_012_500, 0, t1)).unwrap();
        assert!((i - 1.0).abs() < 1e-9);
        assert_eq!(o, 0.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn counter_reset_reads_as_zero() {
        let t0 = Utc::now();
        let mut cache = CounterCache::new();
        cache.observe(1, &reading(1_000, 1_000, t0));
        let reset = cache.observe(1, &reading(10, 10, t0 + chrono::Duration::seconds(5)));
        assert_eq!(reset, Some((0.0, 0.0)));
    }
}
