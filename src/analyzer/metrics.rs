// Domain metrics aggregation: pure reduction of the equipment set into one record per domain

use std::collections::BTreeMap;

use super::alerts::evaluate_alerts;
use crate::models::{
    Criticality, DomainMetrics, DomainOverview, DomainSummary, Equipment, NetworkDomain,
    SupportStatus,
};
use crate::thresholds::ThresholdProfiles;

/// Rollup of every equipment in `domain`. No equipment yields `DomainMetrics::empty`.
pub fn compute_domain_metrics(domain: NetworkDomain, equipment: &[Equipment]) -> DomainMetrics {
    let in_domain: Vec<&Equipment> = equipment.iter().filter(|e| e.domain == domain).collect();
    if in_domain.is_empty() {
        return DomainMetrics::empty(domain);
    }

    let mut equipments_by_type = BTreeMap::new();
    let mut support_status_distribution = BTreeMap::new();
    let mut active_equipments = 0;
    let mut critical_equipments = 0;
    for e in &in_domain {
        *equipments_by_type.entry(e.equipment_type).or_insert(0) += 1;
        *support_status_distribution
            .entry(e.support_status)
            .or_insert(0) += 1;
        if e.support_status != SupportStatus::Obsolete {
            active_equipments += 1;
        }
        if e.criticality == Criticality::Critical {
            critical_equipments += 1;
        }
    }

    let mut total_interfaces = 0;
    let mut active_interfaces = 0;
    let mut utilization_sum = 0.0;
    let mut peak_utilization: f64 = 0.0;
    for iface in in_domain.iter().flat_map(|e| &e.interfaces) {
        total_interfaces += 1;
        if iface.is_up() {
            active_interfaces += 1;
        }
        utilization_sum += iface.in_utilization + iface.out_utilization;
        peak_utilization = peak_utilization.max(iface.peak_utilization());
    }
    // Down interfaces count toward the mean (see DomainMetrics docs).
    let average_utilization = if total_interfaces > 0 {
        utilization_sum / (2 * total_interfaces) as f64
    } else {
        0.0
    };

    DomainMetrics {
        domain,
        total_equipments: in_domain.len(),
        active_equipments,
        critical_equipments,
        total_interfaces,
        active_interfaces,
        average_utilization,
        peak_utilization,
        equipments_by_type,
        support_status_distribution,
    }
}

/// Metrics for all five domains, in `NetworkDomain::ALL` order.
pub fn compute_all_domains(equipment: &[Equipment]) -> Vec<DomainMetrics> {
    NetworkDomain::ALL
        .iter()
        .map(|d| compute_domain_metrics(*d, equipment))
        .collect()
}

/// Network-wide rollup: summed totals, concatenated alerts and a per-domain overview.
pub fn domain_summary(equipment: &[Equipment], thresholds: &ThresholdProfiles) -> DomainSummary {
    let mut summary = DomainSummary {
        total_equipments: 0,
        total_interfaces: 0,
        alerts: Vec::new(),
        domains: BTreeMap::new(),
    };
    for metrics in compute_all_domains(equipment) {
        let alerts = evaluate_alerts(&metrics, thresholds.get(metrics.domain));
        summary.total_equipments += metrics.total_equipments;
        summary.total_interfaces += metrics.total_interfaces;
        summary.domains.insert(
            metrics.domain,
            DomainOverview {
                equipments: metrics.total_equipments,
                interfaces: metrics.total_interfaces,
                active_interfaces: metrics.active_interfaces,
                utilization: metrics.average_utilization,
                alert_count: alerts.len(),
            },
        );
        summary.alerts.extend(alerts);
    }
    summary
}
