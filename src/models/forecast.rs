// Forecast result records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{NetworkDomain, Recommendation};
use crate::error::{ParseEnumError, normalize_token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    #[default]
    Linear,
    Polynomial,
    MovingAverage,
}

impl ForecastMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ForecastMethod::Linear => "linear",
            ForecastMethod::Polynomial => "polynomial",
            ForecastMethod::MovingAverage => "moving_average",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "linear" => Ok(ForecastMethod::Linear),
            "polynomial" | "quadratic" => Ok(ForecastMethod::Polynomial),
            "moving_average" | "movingaverage" => Ok(ForecastMethod::MovingAverage),
            _ => Err(ParseEnumError::new("forecast method", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceForecast {
    /// False when no history exists for the interface in the requested window.
    pub success: bool,
    pub equipment_id: u64,
    pub interface: String,
    pub method: ForecastMethod,
    pub data_points: usize,
    pub current_utilization: Option<f64>,
    pub predictions: Vec<f64>,
    pub trend: Trend,
    /// 1-based future periods whose forecast reaches the saturation threshold.
    pub saturation_periods: Vec<usize>,
    pub saturation_risk: bool,
    pub time_to_saturation: Option<usize>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainForecast {
    pub domain: NetworkDomain,
    pub total_interfaces: usize,
    pub at_risk_interfaces: usize,
    pub risk_percentage: f64,
    /// Mean periods-to-saturation over at-risk interfaces only.
    pub average_time_to_saturation: Option<f64>,
    /// At-risk interface forecasts, in inventory order.
    pub interfaces: Vec<InterfaceForecast>,
    pub recommendations: Vec<Recommendation>,
}
