// History log entries consumed by forecasting

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

use super::{Equipment, Interface, InterfaceStatus};

/// Last-known state of one interface at the time of a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
pub struct InterfaceSample {
    pub name: String,
    pub in_utilization: f64,
    pub out_utilization: f64,
    pub status: InterfaceStatus,
    pub speed_bps: u64,
}

/// One appended snapshot of an equipment. Entries are immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub equipment_id: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub interfaces: Vec<InterfaceSample>,
}

impl HistoryEntry {
    pub fn from_equipment(equipment: &Equipment, timestamp: i64) -> Self {
        Self::from_interfaces(equipment.id, timestamp, &equipment.interfaces)
    }

    /// Entry holding only the given interfaces of an equipment.
    pub fn from_interfaces<'a>(
        equipment_id: u64,
        timestamp: i64,
        interfaces: impl IntoIterator<Item = &'a Interface>,
    ) -> Self {
        Self {
            equipment_id,
            timestamp,
            interfaces: interfaces
                .into_iter()
                .map(|i| InterfaceSample {
                    name: i.name.clone(),
                    in_utilization: i.in_utilization,
                    out_utilization: i.out_utilization,
                    status: i.oper_status,
                    speed_bps: i.speed_bps,
                })
                .collect(),
        }
    }

    pub fn sample(&self, interface: &str) -> Option<&InterfaceSample> {
        self.interfaces.iter().find(|s| s.name == interface)
    }
}
