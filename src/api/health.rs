use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "network": state.config.network.to_string(),
        "mode": state.context.mode.to_string(),
        "tools": state.toolkit.tools().len(),
    }))
}
