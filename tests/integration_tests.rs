// Integration tests: HTTP endpoints over a fixed snapshot and a temp history DB

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::*;
use netcapacity::analyzer::CapacityAnalyzer;
use netcapacity::history_repo::HistoryRepo;
use netcapacity::models::{HistoryEntry, InventorySnapshot, NetworkDomain};
use netcapacity::routes;
use std::sync::Arc;
use tokio::sync::watch;

struct TestApp {
    server: TestServer,
    history_repo: Arc<HistoryRepo>,
    _dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::TempDir::new().unwrap();
    let db_path = dir.path().join("history.db");
    let history_repo = Arc::new(HistoryRepo::connect(db_path.to_str().unwrap(), 90).await.unwrap());
    history_repo.init().await.unwrap();

    let (_tx, snapshot_rx) = watch::channel(Arc::new(InventorySnapshot {
        cycle: 3,
        collected_at: Some(chrono::Utc::now()),
        equipment: sample_network(),
    }));
    let app = routes::app(
        snapshot_rx,
        history_repo.clone(),
        Arc::new(CapacityAnalyzer::default()),
    );
    TestApp {
        server: TestServer::new(app),
        history_repo,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_version_endpoint() {
    let t = test_app().await;
    let response = t.server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("netcapacity")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_equipment_endpoint_returns_snapshot() {
    let t = test_app().await;
    let response = t.server.get("/api/equipment").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["cycle"], 3);
    let equipment = json["equipment"].as_array().unwrap();
    assert_eq!(equipment.len(), 3);
    assert_eq!(equipment[0]["name"], "bb-core-1");
    assert_eq!(equipment[0]["domain"], "Backbone");
}

#[tokio::test]
async fn test_summary_endpoint() {
    let t = test_app().await;
    let response = t.server.get("/api/domains/summary").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["total_equipments"], 3);
    assert_eq!(json["total_interfaces"], 6);
    assert_eq!(json["domains"]["Backbone"]["equipments"], 1);
    assert_eq!(json["domains"]["Backbone"]["active_interfaces"], 2);
    assert_eq!(json["domains"]["Fabric IP"]["interfaces"], 0);
    assert!(json["domains"]["Backbone"]["alert_count"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_metrics_endpoint_accepts_loose_domain_names() {
    let t = test_app().await;
    let response = t.server.get("/api/domains/Backbone/metrics").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["domain"], "Backbone");
    assert_eq!(json["total_interfaces"], 3);
    assert_eq!(json["peak_utilization"], 82.0);

    let response = t.server.get("/api/domains/fabric-ip/metrics").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["domain"], "Fabric IP");
    assert_eq!(json["total_equipments"], 0);
}

#[tokio::test]
async fn test_unknown_domain_is_bad_request() {
    let t = test_app().await;
    for path in [
        "/api/domains/wan/metrics",
        "/api/domains/wan/alerts",
        "/api/domains/wan/critical-interfaces",
        "/api/domains/wan/recommendations",
        "/api/domains/wan/forecast",
    ] {
        let response = t.server.get(path).expect_failure().await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let json: serde_json::Value = response.json();
        assert!(json["error"].as_str().unwrap().contains("wan"), "{path}");
    }
}

#[tokio::test]
async fn test_alerts_endpoint() {
    let t = test_app().await;
    let response = t.server.get("/api/domains/backbone/alerts").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let alerts = json.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["severity"], "critical");
    assert_eq!(alerts[0]["category"], "utilization");
}

#[tokio::test]
async fn test_critical_interfaces_threshold_query() {
    let t = test_app().await;
    let response = t.server.get("/api/domains/backbone/critical-interfaces").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json.as_array().unwrap().is_empty());

    let response = t
        .server
        .get("/api/domains/backbone/critical-interfaces")
        .add_query_param("threshold", 80)
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["interface"], "Gi0/1");
    assert_eq!(list[0]["equipment_name"], "bb-core-1");
}

#[tokio::test]
async fn test_recommendations_endpoint() {
    let t = test_app().await;
    let response = t.server.get("/api/domains/Backbone/recommendations").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["kind"], "urgent_capacity_upgrade");
    assert_eq!(list[0]["priority"], "urgent");
}

#[tokio::test]
async fn test_forecast_rejects_unknown_method() {
    let t = test_app().await;
    let response = t
        .server
        .get("/api/domains/backbone/forecast")
        .add_query_param("method", "cubic")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = t
        .server
        .get("/api/equipment/1/interfaces/Gi0%2F1/forecast")
        .add_query_param("method", "cubic")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_query_and_path_values_are_json_bad_requests() {
    let t = test_app().await;
    let requests = [
        t.server
            .get("/api/domains/backbone/forecast")
            .add_query_param("days", -1),
        t.server
            .get("/api/domains/backbone/forecast")
            .add_query_param("periods", "many"),
        t.server
            .get("/api/domains/backbone/critical-interfaces")
            .add_query_param("threshold", "high"),
        t.server
            .get("/api/equipment/1/interfaces/Gi0%2F1/forecast")
            .add_query_param("days", -1),
        t.server.get("/api/equipment/abc/interfaces/Gi0%2F1/forecast"),
    ];
    for request in requests {
        let response = request.expect_failure().await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let json: serde_json::Value = response.json();
        assert!(!json["error"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_interface_forecast_without_history() {
    let t = test_app().await;
    let response = t
        .server
        .get("/api/equipment/1/interfaces/Gi0%2F1/forecast")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["interface"], "Gi0/1");
    assert_eq!(json["data_points"], 0);
}

#[tokio::test]
async fn test_forecasts_from_stored_history() {
    let t = test_app().await;
    let now = chrono::Utc::now().timestamp_millis();
    // Gi0/1 climbs 37 -> 82 over ten days; Gi0/2 stays flat
    let climbing: Vec<f64> = (0..10).map(|i| 37.0 + 5.0 * f64::from(i)).collect();
    let history: Vec<HistoryEntry> = daily_history(1, "Gi0/1", &climbing, now)
        .into_iter()
        .zip(daily_history(1, "Gi0/2", &[20.0; 10], now))
        .map(|(mut a, b)| {
            a.interfaces.extend(b.interfaces);
            a
        })
        .collect();
    t.history_repo.append_entries(&history).await.unwrap();

    let response = t
        .server
        .get("/api/equipment/1/interfaces/Gi0%2F1/forecast")
        .add_query_param("periods", 4)
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["data_points"], 10);
    assert_eq!(json["method"], "linear");
    assert_eq!(json["trend"], "increasing");
    assert_eq!(json["predictions"].as_array().unwrap().len(), 4);
    assert_eq!(json["saturation_risk"], true);
    assert_eq!(json["time_to_saturation"], 1);

    let response = t
        .server
        .get("/api/domains/backbone/forecast")
        .add_query_param("days", 30)
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["domain"], NetworkDomain::Backbone.as_str());
    assert_eq!(json["total_interfaces"], 3);
    assert_eq!(json["at_risk_interfaces"], 1);
    let at_risk = json["interfaces"].as_array().unwrap();
    assert_eq!(at_risk.len(), 1);
    assert_eq!(at_risk[0]["interface"], "Gi0/1");
    let kinds: Vec<&str> = json["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["kind"].as_str())
        .collect();
    assert_eq!(kinds, vec!["high_saturation_risk"]);
}
