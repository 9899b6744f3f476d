// Advisory recommendations derived from metrics and forecast risk

use crate::models::{DomainMetrics, NetworkDomain, Recommendation, RecommendationKind};
use crate::thresholds::ThresholdProfile;

pub fn recommendations(metrics: &DomainMetrics, profile: &ThresholdProfile) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if metrics.peak_utilization >= profile.utilization_critical {
        out.push(RecommendationKind::UrgentCapacityUpgrade.into());
    } else if metrics.peak_utilization >= profile.utilization_warning {
        out.push(RecommendationKind::CapacityPlanning.into());
    }
    let needs_replacement = metrics
        .support_status_distribution
        .iter()
        .any(|(status, count)| status.needs_replacement() && *count > 0);
    if needs_replacement {
        out.push(RecommendationKind::EquipmentReplacement.into());
    }
    out
}

/// Risk bands: >= 50% urgent, >= 25% high, >= 10% medium; plus domain-specific add-ons.
pub fn forecast_recommendations(
    domain: NetworkDomain,
    risk_percentage: f64,
    at_risk_interfaces: usize,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if risk_percentage >= 50.0 {
        out.push(RecommendationKind::UrgentSaturationRisk.into());
    } else if risk_percentage >= 25.0 {
        out.push(RecommendationKind::HighSaturationRisk.into());
    } else if risk_percentage >= 10.0 {
        out.push(RecommendationKind::MediumSaturationRisk.into());
    }
    match domain {
        NetworkDomain::CoreInternet if at_risk_interfaces > 0 => {
            out.push(RecommendationKind::RedundancyCheck.into());
        }
        NetworkDomain::Backbone if at_risk_interfaces > 2 => {
            out.push(RecommendationKind::LoadBalancingReview.into());
        }
        _ => {}
    }
    out
}
