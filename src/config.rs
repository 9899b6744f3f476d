use std::str::FromStr;

use serde::Deserialize;

use crate::forecast::{self, ForecastParams};
use crate::models::ForecastMethod;
use crate::thresholds::{ThresholdOverrides, ThresholdProfiles};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// `[thresholds.<domain>]` partial overrides of the shipped profiles.
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub flush_rate: u64,
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,
    /// Cron expression for VACUUM (e.g. "0 0 3 * * *"), evaluated in local time.
    pub vacuum_schedule: Option<String>,
    /// Fixed VACUUM period when `vacuum_schedule` is unset.
    #[serde(default = "default_vacuum_interval_secs")]
    pub vacuum_interval_secs: u64,
}

fn default_flush_interval_secs() -> u64 {
    30
}

fn default_retention_days() -> u32 {
    90
}

fn default_prune_interval_secs() -> u64 {
    3600
}

fn default_vacuum_interval_secs() -> u64 {
    86_400
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// JSON equipment inventory loaded at startup.
    pub inventory_path: String,
    pub poll_interval_secs: u64,
    /// Devices polled at the same time.
    pub max_concurrency: usize,
    pub device_timeout_ms: u64,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            inventory_path: "data/inventory.json".into(),
            poll_interval_secs: 300,
            max_concurrency: 8,
            device_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// How often to log app stats (cycles, devices polled, entries saved) at INFO level.
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            stats_log_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub history_window_days: u32,
    pub periods: usize,
    pub method: ForecastMethod,
    pub saturation_threshold: f64,
    pub critical_interface_threshold: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            history_window_days: forecast::DEFAULT_HISTORY_WINDOW_DAYS,
            periods: forecast::DEFAULT_PERIODS,
            method: ForecastMethod::default(),
            saturation_threshold: forecast::SATURATION_THRESHOLD,
            critical_interface_threshold: crate::analyzer::alerts::CRITICAL_INTERFACE_THRESHOLD,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Shipped profiles with the `[thresholds.*]` overrides merged in.
    pub fn threshold_profiles(&self) -> ThresholdProfiles {
        ThresholdProfiles::default().with_overrides(&self.thresholds)
    }

    pub fn forecast_params(&self) -> ForecastParams {
        ForecastParams {
            window_days: self.forecast.history_window_days,
            periods: self.forecast.periods,
            method: self.forecast.method,
            saturation_threshold: self.forecast.saturation_threshold,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.flush_rate > 0,
            "database.flush_rate must be > 0, got {}",
            self.database.flush_rate
        );
        anyhow::ensure!(
            self.database.flush_interval_secs > 0,
            "database.flush_interval_secs must be > 0, got {}",
            self.database.flush_interval_secs
        );
        anyhow::ensure!(
            self.database.retention_days > 0,
            "database.retention_days must be > 0, got {}",
            self.database.retention_days
        );
        anyhow::ensure!(
            self.database.prune_interval_secs > 0,
            "database.prune_interval_secs must be > 0, got {}",
            self.database.prune_interval_secs
        );
        anyhow::ensure!(
            self.database.vacuum_interval_secs > 0,
            "database.vacuum_interval_secs must be > 0, got {}",
            self.database.vacuum_interval_secs
        );
        if let Some(ref expr) = self.database.vacuum_schedule {
            cron::Schedule::from_str(expr).map_err(|e| {
                anyhow::anyhow!("database.vacuum_schedule {:?} is not a valid cron expression: {}", expr, e)
            })?;
        }
        anyhow::ensure!(
            !self.collection.inventory_path.is_empty(),
            "collection.inventory_path must be non-empty"
        );
        anyhow::ensure!(
            self.collection.poll_interval_secs > 0,
            "collection.poll_interval_secs must be > 0, got {}",
            self.collection.poll_interval_secs
        );
        anyhow::ensure!(
            self.collection.max_concurrency > 0,
            "collection.max_concurrency must be > 0, got {}",
            self.collection.max_concurrency
        );
        anyhow::ensure!(
            self.collection.device_timeout_ms > 0,
            "collection.device_timeout_ms must be > 0, got {}",
            self.collection.device_timeout_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.forecast.history_window_days > 0,
            "forecast.history_window_days must be > 0, got {}",
            self.forecast.history_window_days
        );
        anyhow::ensure!(
            self.forecast.periods > 0 && self.forecast.periods <= crate::analyzer::MAX_FORECAST_PERIODS,
            "forecast.periods must be within 1..={}, got {}",
            crate::analyzer::MAX_FORECAST_PERIODS,
            self.forecast.periods
        );
        for (name, v) in [
            ("saturation_threshold", self.forecast.saturation_threshold),
            (
                "critical_interface_threshold",
                self.forecast.critical_interface_threshold,
            ),
        ] {
            anyhow::ensure!(
                v.is_finite() && (0.0..=100.0).contains(&v),
                "forecast.{} must be within 0..=100, got {}",
                name,
                v
            );
        }
        self.threshold_profiles().validate()?;
        Ok(())
    }
}
