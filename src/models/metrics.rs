// Derived per-domain records: metrics, alerts, summaries, recommendations

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EquipmentType, NetworkDomain, SupportStatus};

/// Per-domain rollup, recomputed from the current equipment set on every call.
///
/// `average_utilization` is the mean of every in and out value across all interfaces of the
/// domain, down interfaces included, so many down links depress the average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMetrics {
    pub domain: NetworkDomain,
    pub total_equipments: usize,
    pub active_equipments: usize,
    pub critical_equipments: usize,
    pub total_interfaces: usize,
    pub active_interfaces: usize,
    pub average_utilization: f64,
    pub peak_utilization: f64,
    pub equipments_by_type: BTreeMap<EquipmentType, usize>,
    pub support_status_distribution: BTreeMap<SupportStatus, usize>,
}

impl DomainMetrics {
    pub fn empty(domain: NetworkDomain) -> Self {
        Self {
            domain,
            total_equipments: 0,
            active_equipments: 0,
            critical_equipments: 0,
            total_interfaces: 0,
            active_interfaces: 0,
            average_utilization: 0.0,
            peak_utilization: 0.0,
            equipments_by_type: BTreeMap::new(),
            support_status_distribution: BTreeMap::new(),
        }
    }

    pub fn down_interfaces(&self) -> usize {
        self.total_interfaces.saturating_sub(self.active_interfaces)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Utilization,
    Interfaces,
}

/// Produced fresh on every evaluation; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub domain: NetworkDomain,
    pub category: AlertCategory,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
}

/// Compact per-domain tuple for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainOverview {
    pub equipments: usize,
    pub interfaces: usize,
    pub active_interfaces: usize,
    pub utilization: f64,
    pub alert_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub total_equipments: usize,
    pub total_interfaces: usize,
    pub alerts: Vec<Alert>,
    pub domains: BTreeMap<NetworkDomain, DomainOverview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalInterface {
    pub equipment_id: u64,
    pub equipment_name: String,
    pub interface: String,
    pub in_utilization: f64,
    pub out_utilization: f64,
    pub peak_utilization: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    Urgent,
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    UrgentCapacityUpgrade,
    CapacityPlanning,
    EquipmentReplacement,
    UrgentSaturationRisk,
    HighSaturationRisk,
    MediumSaturationRisk,
    RedundancyCheck,
    LoadBalancingReview,
}

impl RecommendationKind {
    pub fn priority(self) -> RecommendationPriority {
        match self {
            RecommendationKind::UrgentCapacityUpgrade | RecommendationKind::UrgentSaturationRisk => {
                RecommendationPriority::Urgent
            }
            RecommendationKind::HighSaturationRisk | RecommendationKind::RedundancyCheck => {
                RecommendationPriority::High
            }
            RecommendationKind::CapacityPlanning
            | RecommendationKind::EquipmentReplacement
            | RecommendationKind::MediumSaturationRisk
            | RecommendationKind::LoadBalancingReview => RecommendationPriority::Medium,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RecommendationKind::UrgentCapacityUpgrade => {
                "Urgent capacity upgrade: peak utilization is above the critical threshold"
            }
            RecommendationKind::CapacityPlanning => {
                "Capacity planning: peak utilization is above the warning threshold"
            }
            RecommendationKind::EquipmentReplacement => {
                "Equipment replacement: obsolete or fully unsupported equipment is in service"
            }
            RecommendationKind::UrgentSaturationRisk => {
                "Urgent: at least half of the interfaces are forecast to saturate"
            }
            RecommendationKind::HighSaturationRisk => {
                "High: a quarter or more of the interfaces are forecast to saturate"
            }
            RecommendationKind::MediumSaturationRisk => {
                "Medium: schedule capacity review, some interfaces are forecast to saturate"
            }
            RecommendationKind::RedundancyCheck => {
                "Check Internet core redundancy before forecast saturation"
            }
            RecommendationKind::LoadBalancingReview => {
                "Review backbone load balancing across saturating links"
            }
        }
    }
}

/// Advisory annotation; never blocks alert evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: RecommendationPriority,
    pub message: String,
}

impl From<RecommendationKind> for Recommendation {
    fn from(kind: RecommendationKind) -> Self {
        Self {
            kind,
            priority: kind.priority(),
            message: kind.message().to_string(),
        }
    }
}
