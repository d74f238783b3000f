use axum::{extract::State, routing::{get, post}, Json, Router};
use farewatch_deals::DealStats;
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: DealStats,
    pub is_running: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/discovery/start", post(start))
        .route("/v1/discovery/stop", post(stop))
        .route("/v1/discovery/stats", get(stats))
}

async fn start(State(state): State<AppState>) -> Json<Value> {
    let started = state.discovery.start();
    let message = if started { "Auto-discovery started" } else { "Auto-discovery already running" };
    Json(json!({ "success": true, "message": message }))
}

async fn stop(State(state): State<AppState>) -> Json<Value> {
    state.discovery.stop();
    Json(json!({ "success": true, "message": "Auto-discovery stopped" }))
}

async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.ctx().deals().read().await.stats();
    Json(StatsResponse { stats, is_running: state.discovery.is_running() })
}
