// Domain models: inventory, history entries and derived records

mod equipment;
mod forecast;
mod history;
mod interface;
mod metrics;

pub use equipment::{
    Criticality, Equipment, EquipmentType, InventorySnapshot, NetworkDomain, SupportStatus,
};
pub use forecast::{DomainForecast, ForecastMethod, InterfaceForecast, Trend};
pub use history::{HistoryEntry, InterfaceSample};
pub use interface::{Interface, InterfaceStatus};
pub use metrics::{
    Alert, AlertCategory, AlertSeverity, CriticalInterface, DomainMetrics, DomainOverview,
    DomainSummary, Recommendation, RecommendationKind, RecommendationPriority,
};
