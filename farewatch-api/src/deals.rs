use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use farewatch_core::{Deal, DealStatus};
use farewatch_deals::{ManualDeal, SubmitOutcome};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct DealsQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/discovery/deals", get(list_deals).post(import_deal).delete(clear_deals))
        .route("/v1/discovery/deals/{id}/status", post(update_status))
        .route("/v1/discovery/deals/{id}/save", post(save_deal))
        .route("/v1/discovery/deals/{id}/dismiss", post(dismiss_deal))
}

/// `all` and unrecognised filters return every deal.
async fn list_deals(State(state): State<AppState>, Query(query): Query<DealsQuery>) -> Json<Vec<Deal>> {
    let status = query
        .filter
        .as_deref()
        .and_then(|f| f.parse::<DealStatus>().ok());
    Json(state.ctx().deals().read().await.list(status))
}

async fn import_deal(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Response, AppError> {
    let manual: ManualDeal = serde_json::from_value(body)
        .map_err(|e| AppError::ValidationError(format!("Invalid deal: {}", e)))?;
    let deal = manual.into_deal(state.ctx().scorer());

    let outcome = state
        .ctx()
        .deals()
        .write()
        .await
        .import(deal.clone())
        .await
        .map_err(AppError::from_core)?;

    match outcome {
        SubmitOutcome::Inserted => {
            info!("Imported deal {} {} -> {}", deal.id, deal.origin, deal.destination_code);
            Ok((StatusCode::CREATED, Json(deal)).into_response())
        }
        SubmitOutcome::Duplicate => {
            Ok(Json(json!({ "success": false, "message": "Duplicate of an existing deal" })).into_response())
        }
    }
}

async fn clear_deals(State(state): State<AppState>) -> Json<Value> {
    state.ctx().deals().write().await.clear().await;
    info!("Cleared all discovered deals");
    Json(json!({ "success": true }))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Value>, AppError> {
    let status = req.status.parse::<DealStatus>().map_err(AppError::from_core)?;
    set_status(&state, &id, status).await
}

async fn save_deal(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, AppError> {
    set_status(&state, &id, DealStatus::Saved).await
}

async fn dismiss_deal(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, AppError> {
    set_status(&state, &id, DealStatus::Dismissed).await
}

async fn set_status(state: &AppState, id: &str, status: DealStatus) -> Result<Json<Value>, AppError> {
    if state.ctx().update_deal_status(id, status).await {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(AppError::deal_not_found())
    }
}
