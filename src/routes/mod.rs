// HTTP routes: read-only JSON views over the latest snapshot and the history log

mod error;
mod http;

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use crate::analyzer::CapacityAnalyzer;
use crate::history_repo::HistoryRepo;
use crate::models::InventorySnapshot;

pub use error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshot_rx: watch::Receiver<Arc<InventorySnapshot>>,
    pub(crate) history_repo: Arc<HistoryRepo>,
    pub(crate) analyzer: Arc<CapacityAnalyzer>,
}

impl AppState {
    /// Latest published snapshot; cheap Arc clone, the watch lock is not held afterwards.
    pub(crate) fn snapshot(&self) -> Arc<InventorySnapshot> {
        self.snapshot_rx.borrow().clone()
    }
}

pub fn app(
    snapshot_rx: watch::Receiver<Arc<InventorySnapshot>>,
    history_repo: Arc<HistoryRepo>,
    analyzer: Arc<CapacityAnalyzer>,
) -> Router {
    let state = AppState {
        snapshot_rx,
        history_repo,
        analyzer,
    };
    Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/equipment", get(http::equipment_handler)) // GET /api/equipment
        .route("/api/domains/summary", get(http::summary_handler)) // GET /api/domains/summary
        .route("/api/domains/{domain}/metrics", get(http::metrics_handler))
        .route("/api/domains/{domain}/alerts", get(http::alerts_handler))
        .route(
            "/api/domains/{domain}/critical-interfaces",
            get(http::critical_interfaces_handler),
        )
        .route(
            "/api/domains/{domain}/recommendations",
            get(http::recommendations_handler),
        )
        .route(
            "/api/domains/{domain}/forecast",
            get(http::domain_forecast_handler),
        )
        .route(
            "/api/equipment/{id}/interfaces/{name}/forecast",
            get(http::interface_forecast_handler),
        )
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
