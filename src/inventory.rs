// Equipment inventory loader: JSON file of equipment objects with string-typed enum fields.
// Unknown enum strings fall back to documented defaults and are logged, never rejected.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::ParseEnumError;
use crate::models::{
    Criticality, Equipment, EquipmentType, Interface, InterfaceStatus, NetworkDomain,
    SupportStatus,
};

/// One equipment object as stored in the inventory file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEquipment {
    pub id: Option<u64>,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub brand: String,
    pub model: String,
    pub ip_address: String,
    pub location: String,
    pub domain: Option<String>,
    pub support_status: Option<String>,
    #[serde(alias = "criticality")]
    pub criticality_level: Option<String>,
    pub interfaces: Vec<RawInterface>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub installation_date: Option<String>,
    pub end_of_life_date: Option<String>,
    pub replacement_planned: bool,
    pub replacement_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawInterface {
    pub if_index: u32,
    pub name: String,
    pub description: String,
    /// Nominal speed in bits per second.
    #[serde(alias = "speed_bps")]
    pub speed: u64,
    #[serde(alias = "oper_status")]
    pub status: Option<String>,
    pub admin_status: Option<String>,
    pub in_octets: i64,
    pub out_octets: i64,
    pub in_utilization: f64,
    pub out_utilization: f64,
    pub last_updated: Option<String>,
}

/// Reads the inventory file. A missing file is an empty inventory; malformed JSON is an error.
#[instrument(skip_all, fields(operation = "load_inventory", path = %path.as_ref().display()))]
pub fn load_inventory(path: impl AsRef<Path>) -> anyhow::Result<Vec<Equipment>> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("inventory file not found; starting with an empty inventory");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let equipment = parse_inventory(&text)?;
    info!(equipment_count = equipment.len(), "inventory loaded");
    Ok(equipment)
}

/// Parses a JSON array of equipment. Entries without an id get `max(id) + 1` in file order.
pub fn parse_inventory(json: &str) -> anyhow::Result<Vec<Equipment>> {
    let raw: Vec<RawEquipment> = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("inventory JSON: {}", e))?;
    let mut next_id = raw.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
    let now = Utc::now();
    Ok(raw
        .into_iter()
        .map(|r| {
            let id = r.id.unwrap_or_else(|| {
                let id = next_id;
                next_id += 1;
                warn!(equipment = %r.name, assigned_id = id, "equipment without id");
                id
            });
            convert_equipment(id, r, now)
        })
        .collect())
}

fn convert_equipment(id: u64, r: RawEquipment, now: DateTime<Utc>) -> Equipment {
    let interfaces = r
        .interfaces
        .into_iter()
        .map(|i| convert_interface(id, i))
        .collect();
    Equipment {
        id,
        equipment_type: parse_or(id, "type", r.equipment_type.as_deref(), EquipmentType::Other),
        domain: parse_or(id, "domain", r.domain.as_deref(), NetworkDomain::Lan),
        support_status: parse_or(
            id,
            "support_status",
            r.support_status.as_deref(),
            SupportStatus::Active,
        ),
        criticality: parse_or(
            id,
            "criticality_level",
            r.criticality_level.as_deref(),
            Criticality::Medium,
        ),
        name: r.name,
        brand: r.brand,
        model: r.model,
        ip_address: r.ip_address,
        location: r.location,
        interfaces,
        created_at: parse_date(r.created_at.as_deref()).unwrap_or(now),
        updated_at: parse_date(r.updated_at.as_deref()).unwrap_or(now),
        installation_date: parse_date(r.installation_date.as_deref()),
        end_of_life_date: parse_date(r.end_of_life_date.as_deref()),
        replacement_planned: r.replacement_planned,
        replacement_date: parse_date(r.replacement_date.as_deref()),
    }
}

fn convert_interface(equipment_id: u64, r: RawInterface) -> Interface {
    let mut iface = Interface::new(r.if_index, r.name, r.speed);
    iface.description = r.description;
    iface.oper_status = parse_or(
        equipment_id,
        "interface status",
        r.status.as_deref(),
        InterfaceStatus::Unknown,
    );
    iface.admin_status = parse_or(
        equipment_id,
        "interface admin_status",
        r.admin_status.as_deref(),
        InterfaceStatus::Unknown,
    );
    iface.in_octets = r.in_octets.max(0) as u64;
    iface.out_octets = r.out_octets.max(0) as u64;
    iface.apply_utilization((r.in_utilization, r.out_utilization));
    iface.last_updated = parse_date(r.last_updated.as_deref());
    iface
}

/// Parses `value` or falls back to `default`; an absent value falls back silently.
fn parse_or<T>(equipment_id: u64, field: &'static str, value: Option<&str>, default: T) -> T
where
    T: FromStr<Err = ParseEnumError> + std::fmt::Debug,
{
    let Some(v) = value.filter(|v| !v.trim().is_empty()) else {
        return default;
    };
    v.parse().unwrap_or_else(|e: ParseEnumError| {
        warn!(
            equipment_id,
            field,
            error = %e,
            fallback = ?default,
            "unknown inventory value; using fallback"
        );
        default
    })
}

/// RFC 3339, then naive ISO date-time (assumed UTC), then a bare date at midnight UTC.
fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    let s = value?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }
    warn!(value = s, "unparseable inventory date; ignoring");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_lenient() {
        assert!(parse_date(Some("2024-03-01T10:00:00+01:00")).is_some());
        assert!(parse_date(Some("2024-03-01T10:00:00.123456")).is_some());
        assert!(parse_date(Some("2024-03-01")).is_some());
        assert!(parse_date(Some("01/03/2024")).is_none());
        assert!(parse_date(Some("")).is_none());
        assert!(parse_date(None).is_none());
    }
}
