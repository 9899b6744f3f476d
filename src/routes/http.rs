// GET handlers: version, equipment snapshot, domain analytics and forecasts

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::forecast::ForecastParams;
use crate::models::{
    Alert, CriticalInterface, DomainForecast, DomainMetrics, DomainSummary, ForecastMethod,
    InterfaceForecast, InventorySnapshot, NetworkDomain, Recommendation,
};
use crate::version::{VersionInfo, version_info};

const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Deserialize)]
pub(super) struct ThresholdQuery {
    threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ForecastQuery {
    days: Option<u32>,
    periods: Option<usize>,
    method: Option<String>,
}

/// Accepts "LAN", "Fabric IP", "fabric-ip", "fabric_ip" and the like.
fn parse_domain(raw: &str) -> Result<NetworkDomain, ApiError> {
    Ok(raw.parse::<NetworkDomain>()?)
}

fn forecast_params(state: &AppState, q: &ForecastQuery) -> Result<ForecastParams, ApiError> {
    let method = q
        .method
        .as_deref()
        .map(str::parse::<ForecastMethod>)
        .transpose()?;
    Ok(state.analyzer.forecast_params(q.days, q.periods, method))
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> Json<VersionInfo> {
    Json(version_info())
}

/// GET /api/equipment: latest collected snapshot.
pub(super) async fn equipment_handler(State(state): State<AppState>) -> Json<InventorySnapshot> {
    Json(state.snapshot().as_ref().clone())
}

pub(super) async fn summary_handler(State(state): State<AppState>) -> Json<DomainSummary> {
    let snapshot = state.snapshot();
    Json(state.analyzer.summary(&snapshot.equipment))
}

pub(super) async fn metrics_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<DomainMetrics>, ApiError> {
    let domain = parse_domain(&domain)?;
    let snapshot = state.snapshot();
    Ok(Json(state.analyzer.metrics(domain, &snapshot.equipment)))
}

pub(super) async fn alerts_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<Vec<Alert>>, ApiError> {
    let domain = parse_domain(&domain)?;
    let snapshot = state.snapshot();
    Ok(Json(state.analyzer.evaluate(domain, &snapshot.equipment)))
}

/// GET /api/domains/{domain}/critical-interfaces?threshold=
pub(super) async fn critical_interfaces_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    query: Result<Query<ThresholdQuery>, QueryRejection>,
) -> Result<Json<Vec<CriticalInterface>>, ApiError> {
    let domain = parse_domain(&domain)?;
    let Query(q) = query?;
    let snapshot = state.snapshot();
    Ok(Json(state.analyzer.critical_interfaces(
        domain,
        &snapshot.equipment,
        q.threshold,
    )))
}

pub(super) async fn recommendations_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let domain = parse_domain(&domain)?;
    let snapshot = state.snapshot();
    Ok(Json(
        state.analyzer.recommendations(domain, &snapshot.equipment),
    ))
}

/// GET /api/domains/{domain}/forecast?days=&periods=&method=
pub(super) async fn domain_forecast_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<DomainForecast>, ApiError> {
    let domain = parse_domain(&domain)?;
    let Query(q) = query?;
    let params = forecast_params(&state, &q)?;
    let now = now_ms();
    let from = now - i64::from(params.window_days) * MS_PER_DAY;
    let history = state.history_repo.entries_since(from).await?;
    let snapshot = state.snapshot();
    Ok(Json(state.analyzer.forecast_domain(
        domain,
        &snapshot.equipment,
        &history,
        &params,
        now,
    )))
}

/// GET /api/equipment/{id}/interfaces/{name}/forecast: `name` is percent-decoded, so
/// "GigabitEthernet0%2F1" addresses "GigabitEthernet0/1".
pub(super) async fn interface_forecast_handler(
    State(state): State<AppState>,
    path: Result<Path<(u64, String)>, PathRejection>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<InterfaceForecast>, ApiError> {
    let Path((id, name)) = path?;
    let Query(q) = query?;
    let params = forecast_params(&state, &q)?;
    let now = now_ms();
    let from = now - i64::from(params.window_days) * MS_PER_DAY;
    let history = state.history_repo.entries_for_equipment(id, from).await?;
    Ok(Json(
        state
            .analyzer
            .forecast_interface(&history, id, &name, &params, now),
    ))
}
