// Shared test helpers
#![allow(dead_code)]

use netcapacity::models::*;

pub const MS_PER_DAY: i64 = 86_400_000;

pub fn iface(if_index: u32, name: &str, status: InterfaceStatus, in_pct: f64, out_pct: f64) -> Interface {
    let mut i = Interface::new(if_index, name, 1_000_000_000);
    i.oper_status = status;
    i.admin_status = InterfaceStatus::Up;
    i.apply_utilization((in_pct, out_pct));
    i
}

pub fn up(if_index: u32, name: &str, in_pct: f64, out_pct: f64) -> Interface {
    iface(if_index, name, InterfaceStatus::Up, in_pct, out_pct)
}

pub fn down(if_index: u32, name: &str) -> Interface {
    iface(if_index, name, InterfaceStatus::Down, 0.0, 0.0)
}

pub fn equipment(id: u64, name: &str, domain: NetworkDomain, interfaces: Vec<Interface>) -> Equipment {
    let mut e = Equipment::new(id, name, EquipmentType::Router, domain);
    e.interfaces = interfaces;
    e
}

/// History entries for one interface, one per day ending at `now_ms`, oldest first.
pub fn daily_history(equipment_id: u64, interface: &str, out_values: &[f64], now_ms: i64) -> Vec<HistoryEntry> {
    let n = out_values.len() as i64;
    out_values
        .iter()
        .enumerate()
        .map(|(i, v)| HistoryEntry {
            equipment_id,
            timestamp: now_ms - (n - 1 - i as i64) * MS_PER_DAY,
            interfaces: vec![InterfaceSample {
                name: interface.to_string(),
                in_utilization: 0.0,
                out_utilization: *v,
                status: InterfaceStatus::Up,
                speed_bps: 1_000_000_000,
            }],
        })
        .collect()
}

/// Three routers, one each in Backbone, Datacenter and LAN.
pub fn sample_network() -> Vec<Equipment> {
    vec![
        equipment(
            1,
            "bb-core-1",
            NetworkDomain::Backbone,
            vec![up(1, "Gi0/1", 82.0, 70.0), up(2, "Gi0/2", 40.0, 50.0), down(3, "Gi0/3")],
        ),
        equipment(
            2,
            "dc-spine-1",
            NetworkDomain::Datacenter,
            vec![up(1, "Te0/1", 30.0, 20.0), up(2, "Te0/2", 10.0, 90.0)],
        ),
        equipment(
            3,
            "lan-sw-1",
            NetworkDomain::Lan,
            vec![up(1, "Fa0/1", 5.0, 5.0)],
        ),
    ]
}
