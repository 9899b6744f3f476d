// Equipment model and its closed enumerations

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Interface;
use crate::error::{ParseEnumError, normalize_token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    Router,
    Switch,
    Firewall,
    LoadBalancer,
    Server,
    Other,
}

impl EquipmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            EquipmentType::Router => "router",
            EquipmentType::Switch => "switch",
            EquipmentType::Firewall => "firewall",
            EquipmentType::LoadBalancer => "load_balancer",
            EquipmentType::Server => "server",
            EquipmentType::Other => "other",
        }
    }
}

impl FromStr for EquipmentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            // "routeur" is the spelling used by existing inventory files
            "router" | "routeur" => Ok(EquipmentType::Router),
            "switch" => Ok(EquipmentType::Switch),
            "firewall" => Ok(EquipmentType::Firewall),
            "load_balancer" | "loadbalancer" => Ok(EquipmentType::LoadBalancer),
            "server" => Ok(EquipmentType::Server),
            "other" => Ok(EquipmentType::Other),
            _ => Err(ParseEnumError::new("equipment type", s)),
        }
    }
}

/// Network domain; selects the threshold profile of every interface on the equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NetworkDomain {
    #[serde(rename = "LAN")]
    Lan,
    #[serde(rename = "Backbone")]
    Backbone,
    #[serde(rename = "Datacenter")]
    Datacenter,
    #[serde(rename = "Fabric IP")]
    FabricIp,
    #[serde(rename = "Core Internet")]
    CoreInternet,
}

impl NetworkDomain {
    pub const ALL: [NetworkDomain; 5] = [
        NetworkDomain::Lan,
        NetworkDomain::Backbone,
        NetworkDomain::Datacenter,
        NetworkDomain::FabricIp,
        NetworkDomain::CoreInternet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkDomain::Lan => "LAN",
            NetworkDomain::Backbone => "Backbone",
            NetworkDomain::Datacenter => "Datacenter",
            NetworkDomain::FabricIp => "Fabric IP",
            NetworkDomain::CoreInternet => "Core Internet",
        }
    }
}

impl fmt::Display for NetworkDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkDomain {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "lan" => Ok(NetworkDomain::Lan),
            "backbone" => Ok(NetworkDomain::Backbone),
            "datacenter" | "data_center" => Ok(NetworkDomain::Datacenter),
            "fabric_ip" | "fabricip" => Ok(NetworkDomain::FabricIp),
            "core_internet" | "coreinternet" | "cœur_internet" | "coeur_internet" => {
                Ok(NetworkDomain::CoreInternet)
            }
            _ => Err(ParseEnumError::new("network domain", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportStatus {
    Active,
    #[serde(rename = "end_of_support_software")]
    EndOfSupportSoftware,
    #[serde(rename = "end_of_support_hardware")]
    EndOfSupportHardware,
    #[serde(rename = "end_of_support_both")]
    EndOfSupportBoth,
    Obsolete,
}

impl SupportStatus {
    /// Equipment that needs replacement planning regardless of load.
    pub fn needs_replacement(self) -> bool {
        matches!(
            self,
            SupportStatus::Obsolete | SupportStatus::EndOfSupportBoth
        )
    }
}

impl FromStr for SupportStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "active" => Ok(SupportStatus::Active),
            "end_of_support_software" | "end_of_support_sw" => {
                Ok(SupportStatus::EndOfSupportSoftware)
            }
            "end_of_support_hardware" | "end_of_support_hw" => {
                Ok(SupportStatus::EndOfSupportHardware)
            }
            "end_of_support_both" => Ok(SupportStatus::EndOfSupportBoth),
            "obsolete" => Ok(SupportStatus::Obsolete),
            _ => Err(ParseEnumError::new("support status", s)),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl FromStr for Criticality {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" => Ok(Criticality::Low),
            "medium" => Ok(Criticality::Medium),
            "high" => Ok(Criticality::High),
            "critical" => Ok(Criticality::Critical),
            _ => Err(ParseEnumError::new("criticality level", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub brand: String,
    pub model: String,
    pub ip_address: String,
    pub location: String,
    pub domain: NetworkDomain,
    pub support_status: SupportStatus,
    pub criticality: Criticality,
    pub interfaces: Vec<Interface>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub installation_date: Option<DateTime<Utc>>,
    pub end_of_life_date: Option<DateTime<Utc>>,
    pub replacement_planned: bool,
    pub replacement_date: Option<DateTime<Utc>>,
}

impl Equipment {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        equipment_type: EquipmentType,
        domain: NetworkDomain,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            equipment_type,
            brand: String::new(),
            model: String::new(),
            ip_address: String::new(),
            location: String::new(),
            domain,
            support_status: SupportStatus::Active,
            criticality: Criticality::Medium,
            interfaces: Vec::new(),
            created_at: now,
            updated_at: now,
            installation_date: None,
            end_of_life_date: None,
            replacement_planned: false,
            replacement_date: None,
        }
    }

    pub fn active_interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(|i| i.is_up())
    }

    pub fn interface_by_name(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Mean (in, out) utilization over operationally up interfaces; (0, 0) when none are up.
    pub fn total_utilization(&self) -> (f64, f64) {
        let (count, sum_in, sum_out) = self
            .active_interfaces()
            .fold((0usize, 0.0, 0.0), |(n, i, o), iface| {
                (n + 1, i + iface.in_utilization, o + iface.out_utilization)
            });
        if count == 0 {
            return (0.0, 0.0);
        }
        (sum_in / count as f64, sum_out / count as f64)
    }
}

/// Latest collected view of the inventory, published by the poll worker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventorySnapshot {
    pub cycle: u64,
    pub collected_at: Option<DateTime<Utc>>,
    pub equipment: Vec<Equipment>,
}
