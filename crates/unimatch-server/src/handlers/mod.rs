//! HTTP route handlers for the unimatch server.

pub mod kb;
pub mod predict;

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{HealthResponse, RootResponse};
use crate::ServerState;

/// Service version reported by the health check.
pub const SERVICE_VERSION: &str = "0.4.0";

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        name: "Unimatch AI",
        message: "Backend is running. Use /api/health.",
    })
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        name: "unimatch-ai",
        version: SERVICE_VERSION,
        llm_enabled: state.llm_enabled(),
    })
}
