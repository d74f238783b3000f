use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use farewatch_api::{app, AppState};
use farewatch_catalog::{DealScorer, SearchPlanner};
use farewatch_core::MockSearchProvider;
use farewatch_deals::DealStore;
use farewatch_discovery::{DiscoveryContext, DiscoveryLoop};
use farewatch_store::app_config::{DealsConfig, DiscoveryConfig};
use farewatch_store::{MemoryDealRepository, MemorySettingsRepository};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> (Router, AppState) {
    let deals = DealStore::open(Arc::new(MemoryDealRepository::new()), DealsConfig::default()).await;
    let ctx = DiscoveryContext::bootstrap(
        Arc::new(MemorySettingsRepository::new()),
        deals,
        Arc::new(MockSearchProvider::with_seed(42)),
        SearchPlanner::default(),
        DealScorer::default(),
    )
    .await;
    let config = DiscoveryConfig {
        search_interval_ms: 10,
        error_backoff_ms: 10,
        ..DiscoveryConfig::default()
    };
    let state = AppState::new(DiscoveryLoop::new(Arc::new(ctx), config));
    (app(state.clone()), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn cyprus_deal(price: f64, departure: &str, ret: &str) -> Value {
    json!({
        "origin": "LHR",
        "destination": "Cyprus",
        "destinationCode": "LCA",
        "price": price,
        "airline": "Virgin Atlantic",
        "departureDate": departure,
        "returnDate": ret,
        "budget": 2100
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_stats() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, Method::GET, "/v1/discovery/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["avgPrice"], 0.0);
    assert_eq!(body["bestDeal"], Value::Null);
    assert_eq!(body["isRunning"], false);
}

#[tokio::test]
async fn test_manual_deal_lifecycle() {
    let (app, _) = test_app().await;

    let (status, deal) = send(
        &app,
        Method::POST,
        "/v1/discovery/deals",
        Some(cyprus_deal(1020.0, "2025-08-22", "2025-08-27")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(deal["savings"], 1080.0);
    assert_eq!(deal["isGreatDeal"], true);
    assert_eq!(deal["dealScore"], 7);
    assert_eq!(deal["status"], "new");
    let id = deal["id"].as_str().unwrap().to_string();

    // within £50 on the same route and date
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/discovery/deals",
        Some(cyprus_deal(1049.0, "2025-08-22", "2025-08-27")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, Method::POST, &format!("/v1/discovery/deals/{}/save", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, saved) = send(&app, Method::GET, "/v1/discovery/deals?filter=saved", None).await;
    assert_eq!(saved.as_array().unwrap().len(), 1);
    let (_, fresh) = send(&app, Method::GET, "/v1/discovery/deals?filter=new", None).await;
    assert!(fresh.as_array().unwrap().is_empty());
    let (_, all) = send(&app, Method::GET, "/v1/discovery/deals?filter=bogus", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/v1/discovery/deals/{}/status", id),
        Some(json!({ "status": "dismissed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(&app, Method::GET, "/v1/discovery/stats", None).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["dismissed"], 1);
    assert_eq!(stats["greatDeals"], 1);
    assert_eq!(stats["bestDeal"]["id"], id.as_str());

    let (status, _) = send(&app, Method::DELETE, "/v1/discovery/deals", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, all) = send(&app, Method::GET, "/v1/discovery/deals", None).await;
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ranked_listing() {
    let (app, _) = test_app().await;
    send(&app, Method::POST, "/v1/discovery/deals", Some(cyprus_deal(1800.0, "2025-08-01", "2025-08-06"))).await;
    send(&app, Method::POST, "/v1/discovery/deals", Some(cyprus_deal(900.0, "2025-08-04", "2025-08-09"))).await;

    let (_, all) = send(&app, Method::GET, "/v1/discovery/deals", None).await;
    let prices: Vec<f64> = all.as_array().unwrap().iter().map(|d| d["price"].as_f64().unwrap()).collect();
    assert_eq!(prices, vec![900.0, 1800.0]);
}

#[tokio::test]
async fn test_unknown_deal_is_not_found() {
    let (app, _) = test_app().await;

    for path in ["save", "dismiss"] {
        let (status, body) = send(&app, Method::POST, &format!("/v1/discovery/deals/nope/{}", path), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Deal not found" }));
    }
}

#[tokio::test]
async fn test_invalid_input_is_bad_request() {
    let (app, _) = test_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/discovery/deals",
        Some(cyprus_deal(1020.0, "2025-08-22", "2025-08-20")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/discovery/deals/any/status",
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("archived"));
}

#[tokio::test]
async fn test_settings_round_trip() {
    let (app, state) = test_app().await;

    let (status, mut settings) = send(&app, Method::GET, "/v1/discovery/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["budget"]["perPerson"], 600.0);

    settings["destinations"] = json!(["cyprus", "malta"]);
    settings["airports"] = json!(["lhr"]);
    let (status, body) = send(&app, Method::POST, "/v1/discovery/settings", Some(settings)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["searchConfigs"], 2 * 9);
    assert_eq!(body["settings"]["airports"], json!(["LHR"]));

    assert_eq!(state.ctx().settings().await.airports, vec!["LHR"]);

    let (status, _) = send(&app, Method::POST, "/v1/discovery/settings", Some(json!({ "travelers": {} }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, mut settings) = send(&app, Method::GET, "/v1/discovery/settings", None).await;
    settings["airports"] = json!([]);
    let (status, _) = send(&app, Method::POST, "/v1/discovery/settings", Some(settings)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_and_stop() {
    let (app, state) = test_app().await;

    let (status, body) = send(&app, Method::POST, "/v1/discovery/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let (_, again) = send(&app, Method::POST, "/v1/discovery/start", None).await;
    assert_eq!(again["message"], "Auto-discovery already running");

    let (_, stats) = send(&app, Method::GET, "/v1/discovery/stats", None).await;
    assert_eq!(stats["isRunning"], true);

    let (status, _) = send(&app, Method::POST, "/v1/discovery/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!state.discovery.is_running());
}

#[tokio::test]
async fn test_stream_is_event_stream() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/v1/discovery/stream").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
}
