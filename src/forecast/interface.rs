// Per-interface and per-domain saturation forecasts built on the history log

use super::{ForecastParams, analyze_trend, predict};
use crate::analyzer::recommendations::forecast_recommendations;
use crate::models::{
    DomainForecast, Equipment, HistoryEntry, InterfaceForecast, NetworkDomain, Trend,
};

const MS_PER_DAY: i64 = 86_400_000;

/// Forecast of one interface's outbound utilization from the history entries of its equipment
/// inside the window ending at `now_ms`. Missing history gives `success == false`; never fails.
pub fn predict_interface(
    history: &[HistoryEntry],
    equipment_id: u64,
    interface: &str,
    params: &ForecastParams,
    now_ms: i64,
) -> InterfaceForecast {
    let from_ms = now_ms.saturating_sub(i64::from(params.window_days).saturating_mul(MS_PER_DAY));
    let mut points: Vec<(i64, f64)> = history
        .iter()
        .filter(|e| e.equipment_id == equipment_id && e.timestamp >= from_ms)
        .filter_map(|e| e.sample(interface).map(|s| (e.timestamp, s.out_utilization)))
        .collect();
    // Appends from concurrent collectors may land out of order.
    points.sort_by_key(|(ts, _)| *ts);
    let series: Vec<f64> = points.into_iter().map(|(_, v)| v).collect();

    let mut result = InterfaceForecast {
        success: false,
        equipment_id,
        interface: interface.to_string(),
        method: params.method,
        data_points: series.len(),
        current_utilization: series.last().copied(),
        predictions: Vec::new(),
        trend: Trend::Unknown,
        saturation_periods: Vec::new(),
        saturation_risk: false,
        time_to_saturation: None,
        message: None,
    };

    let predictions = match predict(&series, params.periods, params.method) {
        Ok(Some(p)) => p,
        Ok(None) => {
            result.message = Some(format!(
                "no history for interface {interface} of equipment {equipment_id} in the last {} days",
                params.window_days
            ));
            return result;
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                equipment_id,
                interface,
                operation = "predict_interface",
                "history series rejected"
            );
            result.message = Some(e.to_string());
            return result;
        }
    };

    result.saturation_periods = predictions
        .iter()
        .enumerate()
        .filter(|(_, v)| **v >= params.saturation_threshold)
        .map(|(i, _)| i + 1)
        .collect();
    result.time_to_saturation = result.saturation_periods.first().copied();
    result.saturation_risk = result.time_to_saturation.is_some();
    result.trend = analyze_trend(&series);
    result.predictions = predictions;
    result.success = true;
    result
}

/// Runs `predict_interface` for every interface of every equipment in `domain` and rolls up risk.
pub fn predict_domain(
    domain: NetworkDomain,
    equipment: &[Equipment],
    history: &[HistoryEntry],
    params: &ForecastParams,
    now_ms: i64,
) -> DomainForecast {
    let mut total_interfaces = 0usize;
    let mut at_risk = Vec::new();
    for e in equipment.iter().filter(|e| e.domain == domain) {
        // Only this equipment's entries, so each interface scans a small slice.
        let own: Vec<HistoryEntry> = history
            .iter()
            .filter(|h| h.equipment_id == e.id)
            .cloned()
            .collect();
        for iface in &e.interfaces {
            total_interfaces += 1;
            let f = predict_interface(&own, e.id, &iface.name, params, now_ms);
            if f.saturation_risk {
                at_risk.push(f);
            }
        }
    }

    let risk_percentage = if total_interfaces > 0 {
        at_risk.len() as f64 / total_interfaces as f64 * 100.0
    } else {
        0.0
    };
    let times: Vec<usize> = at_risk
        .iter()
        .filter_map(|f| f.time_to_saturation)
        .collect();
    let average_time_to_saturation = if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<usize>() as f64 / times.len() as f64)
    };
    let recommendations = forecast_recommendations(domain, risk_percentage, at_risk.len());

    tracing::debug!(
        domain = %domain,
        total_interfaces,
        at_risk_interfaces = at_risk.len(),
        operation = "predict_domain",
        "domain forecast computed"
    );

    DomainForecast {
        domain,
        total_interfaces,
        at_risk_interfaces: at_risk.len(),
        risk_percentage,
        average_time_to_saturation,
        interfaces: at_risk,
        recommendations,
    }
}
