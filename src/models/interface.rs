// Network interface model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use wincode::{SchemaRead, SchemaWrite};

use crate::error::{ParseEnumError, normalize_token};
use crate::utilization::clamp_percent;

/// Operational / administrative interface status; serializes to snake_case (e.g. "admin_down").
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    SchemaRead,
    SchemaWrite,
)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceStatus {
    Up,
    Down,
    AdminDown,
    Testing,
    #[default]
    Unknown,
}

impl InterfaceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InterfaceStatus::Up => "up",
            InterfaceStatus::Down => "down",
            InterfaceStatus::AdminDown => "admin_down",
            InterfaceStatus::Testing => "testing",
            InterfaceStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InterfaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "up" => Ok(InterfaceStatus::Up),
            "down" => Ok(InterfaceStatus::Down),
            "admin_down" | "admindown" => Ok(InterfaceStatus::AdminDown),
            "testing" => Ok(InterfaceStatus::Testing),
            "unknown" => Ok(InterfaceStatus::Unknown),
            _ => Err(ParseEnumError::new("interface status", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub if_index: u32,
    pub name: String,
    pub description: String,
    /// Nominal speed in bits per second.
    pub speed_bps: u64,
    pub oper_status: InterfaceStatus,
    pub admin_status: InterfaceStatus,
    pub in_octets: u64,
    pub out_octets: u64,
    /// Inbound utilization, always within [0, 100].
    #[serde(deserialize_with = "clamped_percent")]
    pub in_utilization: f64,
    /// Outbound utilization, always within [0, 100].
    #[serde(deserialize_with = "clamped_percent")]
    pub out_utilization: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

fn clamped_percent<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    f64::deserialize(d).map(clamp_percent)
}

impl Interface {
    pub fn new(if_index: u32, name: impl Into<String>, speed_bps: u64) -> Self {
        Self {
            if_index,
            name: name.into(),
            description: String::new(),
            speed_bps,
            oper_status: InterfaceStatus::Unknown,
            admin_status: InterfaceStatus::Unknown,
            in_octets: 0,
            out_octets: 0,
            in_utilization: 0.0,
            out_utilization: 0.0,
            last_updated: None,
        }
    }

    pub fn is_up(&self) -> bool {
        self.oper_status == InterfaceStatus::Up
    }

    pub fn peak_utilization(&self) -> f64 {
        self.in_utilization.max(self.out_utilization)
    }

    /// Stores an (in, out) pair, clamping both sides into [0, 100].
    pub fn apply_utilization(&mut self, (in_pct, out_pct): (f64, f64)) {
        self.in_utilization = clamp_percent(in_pct);
        self.out_utilization = clamp_percent(out_pct);
    }
}
