use axum::{extract::State, routing::get, Json, Router};
use farewatch_core::Settings;
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/discovery/settings", get(get_settings).post(update_settings))
}

async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.ctx().settings().await)
}

/// Malformed bodies are a 400 like any other invalid settings.
async fn update_settings(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Json<Value>, AppError> {
    let settings: Settings = serde_json::from_value(body).map_err(|e| {
        AppError::ValidationError(format!(
            "Invalid settings format. Required: travelers, dates, budget, destinations, airports ({})",
            e
        ))
    })?;

    let search_configs = state.ctx().update_settings(settings).await.map_err(AppError::from_core)?;
    let saved = serde_json::to_value(state.ctx().settings().await)?;

    Ok(Json(json!({
        "success": true,
        "message": "Settings saved. Discovery continues with the new preferences.",
        "searchConfigs": search_configs,
        "settings": saved,
    })))
}
