//! # API Module
//!
//! HTTP surface of the toolkit.
//!
//! ## Available Endpoints
//! - `GET /api/health` - Liveness probe
//! - `GET /api/tools` - List tools with their descriptions and input schemas
//! - `POST /api/tools/:method` - Run a tool; the body is its JSON arguments
//! - `POST /api/rpc` - MCP JSON-RPC over HTTP

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod health;
pub mod tools;

/// Builds the full application router with every route nested under `/api`.
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/tools", get(tools::list_tools_handler))
        .route("/tools/:method", post(tools::call_tool_handler))
        // JSON-RPC endpoint for MCP tool calls
        .route("/rpc", post(tools::rpc_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
