// Utilization forecasting: linear, quadratic and moving-average projections over a series.
// Predictions are utilization percentages, always clamped to [0, 100].

mod interface;
mod regression;
mod trend;

pub use interface::{predict_domain, predict_interface};
pub use trend::analyze_trend;

use crate::error::ForecastError;
use crate::models::ForecastMethod;
use crate::utilization::clamp_percent;

pub const DEFAULT_PERIODS: usize = 12;
pub const DEFAULT_HISTORY_WINDOW_DAYS: u32 = 30;
/// Forecast utilization (%) at which an interface counts as saturating.
pub const SATURATION_THRESHOLD: f64 = 85.0;

/// Projects `periods` future values of `series` (indexed 0..n-1, assumed time-ordered).
///
/// Returns `Ok(None)` for an empty series so "no input" stays distinct from "predicted zero".
/// A NaN or infinite observation is a caller bug and fails loudly.
pub fn predict(
    series: &[f64],
    periods: usize,
    method: ForecastMethod,
) -> Result<Option<Vec<f64>>, ForecastError> {
    if let Some(index) = series.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::NonFiniteObservation { index });
    }
    if series.is_empty() {
        return Ok(None);
    }
    let raw = match method {
        ForecastMethod::Linear => regression::project_linear(series, periods),
        ForecastMethod::Polynomial => regression::project_quadratic(series, periods),
        ForecastMethod::MovingAverage => regression::project_moving_average(series, periods),
    };
    Ok(Some(raw.into_iter().map(clamp_percent).collect()))
}

/// Knobs shared by the per-interface and per-domain forecasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    pub window_days: u32,
    pub periods: usize,
    pub method: ForecastMethod,
    pub saturation_threshold: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_HISTORY_WINDOW_DAYS,
            periods: DEFAULT_PERIODS,
            method: ForecastMethod::Linear,
            saturation_threshold: SATURATION_THRESHOLD,
        }
    }
}
