// Capacity analyzer: domain metrics, threshold alerts, recommendations and forecasts.
// Built explicitly from config and shared through app state; holds no mutable state.

pub mod alerts;
pub mod metrics;
pub mod recommendations;

use crate::config::AppConfig;
use crate::forecast::{self, ForecastParams};
use crate::models::{
    Alert, CriticalInterface, DomainForecast, DomainMetrics, DomainSummary, Equipment,
    ForecastMethod, HistoryEntry, InterfaceForecast, NetworkDomain, Recommendation,
};
use crate::thresholds::ThresholdProfiles;

/// Upper bound on forecast horizon accepted from callers.
pub const MAX_FORECAST_PERIODS: usize = 1_000;

#[derive(Debug, Clone)]
pub struct CapacityAnalyzer {
    thresholds: ThresholdProfiles,
    forecast: ForecastParams,
    critical_interface_threshold: f64,
}

impl Default for CapacityAnalyzer {
    fn default() -> Self {
        Self::new(ThresholdProfiles::default(), ForecastParams::default())
    }
}

impl CapacityAnalyzer {
    pub fn new(thresholds: ThresholdProfiles, forecast: ForecastParams) -> Self {
        Self {
            thresholds,
            forecast,
            critical_interface_threshold: alerts::CRITICAL_INTERFACE_THRESHOLD,
        }
    }

    /// Assumes `config` already passed `AppConfig::validate`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            thresholds: config.threshold_profiles(),
            forecast: config.forecast_params(),
            critical_interface_threshold: config.forecast.critical_interface_threshold,
        }
    }

    pub fn thresholds(&self) -> &ThresholdProfiles {
        &self.thresholds
    }

    pub fn forecast_defaults(&self) -> &ForecastParams {
        &self.forecast
    }

    pub fn metrics(&self, domain: NetworkDomain, equipment: &[Equipment]) -> DomainMetrics {
        metrics::compute_domain_metrics(domain, equipment)
    }

    /// Metrics for `domain` checked against that domain's profile.
    pub fn evaluate(&self, domain: NetworkDomain, equipment: &[Equipment]) -> Vec<Alert> {
        let m = self.metrics(domain, equipment);
        alerts::evaluate_alerts(&m, self.thresholds.get(domain))
    }

    /// `threshold` of `None` uses the configured default (85% unless overridden).
    pub fn critical_interfaces(
        &self,
        domain: NetworkDomain,
        equipment: &[Equipment],
        threshold: Option<f64>,
    ) -> Vec<CriticalInterface> {
        let threshold = threshold
            .filter(|t| t.is_finite())
            .unwrap_or(self.critical_interface_threshold);
        alerts::critical_interfaces(domain, equipment, threshold)
    }

    pub fn recommendations(
        &self,
        domain: NetworkDomain,
        equipment: &[Equipment],
    ) -> Vec<Recommendation> {
        let m = self.metrics(domain, equipment);
        recommendations::recommendations(&m, self.thresholds.get(domain))
    }

    pub fn summary(&self, equipment: &[Equipment]) -> DomainSummary {
        metrics::domain_summary(equipment, &self.thresholds)
    }

    /// Configured forecast settings with per-request overrides applied.
    /// Days below 1 become 1 and periods are capped at `MAX_FORECAST_PERIODS`.
    pub fn forecast_params(
        &self,
        days: Option<u32>,
        periods: Option<usize>,
        method: Option<ForecastMethod>,
    ) -> ForecastParams {
        let mut params = self.forecast;
        if let Some(d) = days {
            params.window_days = d.max(1);
        }
        if let Some(p) = periods {
            params.periods = p.min(MAX_FORECAST_PERIODS);
        }
        if let Some(m) = method {
            params.method = m;
        }
        params
    }

    pub fn forecast_interface(
        &self,
        history: &[HistoryEntry],
        equipment_id: u64,
        interface: &str,
        params: &ForecastParams,
        now_ms: i64,
    ) -> InterfaceForecast {
        forecast::predict_interface(history, equipment_id, interface, params, now_ms)
    }

    pub fn forecast_domain(
        &self,
        domain: NetworkDomain,
        equipment: &[Equipment],
        history: &[HistoryEntry],
        params: &ForecastParams,
        now_ms: i64,
    ) -> DomainForecast {
        forecast::predict_domain(domain, equipment, history, params, now_ms)
    }
}
