// src/api/tools.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::{
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

pub async fn list_tools_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tools": state.toolkit.describe(&state.context) }))
}

/// Runs one tool. Tool failures are reported in the body with `isError: true`.
pub async fn call_tool_handler(
    State(state): State<AppState>,
    Path(method): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    let args: Value = if body.is_empty() {
        json!({})
    } else {
        match serde_json::from_slice(&body) {
            Ok(args) => args,
            Err(e) => {
                warn!("Rejecting malformed arguments for {}: {}", method, e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("Invalid JSON body: {}", e) })),
                );
            }
        }
    };

    match state
        .toolkit
        .execute(&method, state.client.as_ref(), &state.context, args)
        .await
    {
        Some(output) => (
            StatusCode::OK,
            Json(json!({
                "method": method,
                "isError": output.is_error(),
                "humanMessage": output.human_message(),
                "result": output,
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown tool: {}", method) })),
        ),
    }
}

// Forward JSON-RPC requests over HTTP to the MCP handler
pub async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> Json<Response> {
    match handle_mcp_request(req, state).await {
        Some(resp) => Json(resp),
        None => Json(Response::error(
            Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}
