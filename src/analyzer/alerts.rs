// Threshold evaluation and the critical-interface query

use crate::models::{
    Alert, AlertCategory, AlertSeverity, CriticalInterface, DomainMetrics, Equipment,
    NetworkDomain,
};
use crate::thresholds::ThresholdProfile;

/// Default utilization (%) for `critical_interfaces`.
pub const CRITICAL_INTERFACE_THRESHOLD: f64 = 85.0;

/// Utilization check first, then interfaces-down. Critical wins over warning, so each
/// category yields at most one alert.
pub fn evaluate_alerts(metrics: &DomainMetrics, profile: &ThresholdProfile) -> Vec<Alert> {
    let mut alerts = Vec::with_capacity(2);
    let domain = metrics.domain;

    let peak = metrics.peak_utilization;
    let utilization = if peak >= profile.utilization_critical {
        Some((AlertSeverity::Critical, profile.utilization_critical))
    } else if peak >= profile.utilization_warning {
        Some((AlertSeverity::Warning, profile.utilization_warning))
    } else {
        None
    };
    if let Some((severity, threshold)) = utilization {
        alerts.push(Alert {
            severity,
            domain,
            category: AlertCategory::Utilization,
            message: format!(
                "{domain}: peak utilization {peak:.1}% reached the {severity} threshold of {threshold:.1}%"
            ),
            value: peak,
            threshold,
        });
    }

    let down = metrics.down_interfaces();
    let down_count = u32::try_from(down).unwrap_or(u32::MAX);
    let interfaces = if down_count >= profile.interface_down_critical {
        Some((AlertSeverity::Critical, profile.interface_down_critical))
    } else if down_count >= profile.interface_down_warning {
        Some((AlertSeverity::Warning, profile.interface_down_warning))
    } else {
        None
    };
    if let Some((severity, threshold)) = interfaces {
        alerts.push(Alert {
            severity,
            domain,
            category: AlertCategory::Interfaces,
            message: format!(
                "{domain}: {down} of {} interfaces are not up ({severity} threshold {threshold})",
                metrics.total_interfaces
            ),
            value: down as f64,
            threshold: f64::from(threshold),
        });
    }

    alerts
}

/// Interfaces in `domain` whose inbound or outbound utilization reaches `threshold`,
/// highest `max(in, out)` first; ties keep inventory order.
pub fn critical_interfaces(
    domain: NetworkDomain,
    equipment: &[Equipment],
    threshold: f64,
) -> Vec<CriticalInterface> {
    let mut out: Vec<CriticalInterface> = equipment
        .iter()
        .filter(|e| e.domain == domain)
        .flat_map(|e| e.interfaces.iter().map(move |i| (e, i)))
        .filter(|(_, i)| i.in_utilization >= threshold || i.out_utilization >= threshold)
        .map(|(e, i)| CriticalInterface {
            equipment_id: e.id,
            equipment_name: e.name.clone(),
            interface: i.name.clone(),
            in_utilization: i.in_utilization,
            out_utilization: i.out_utilization,
            peak_utilization: i.peak_utilization(),
        })
        .collect();
    // sort_by is stable, which keeps input order for equal peaks
    out.sort_by(|a, b| b.peak_utilization.total_cmp(&a.peak_utilization));
    out
}
