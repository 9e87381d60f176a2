//! Plain REST handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use byt_types::HealthResponse;

use crate::state::AppState;

/// Health check with the current session count.
///
/// # Route
///
/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("healthy"),
        connections: state.connections(),
        uptime: state.uptime(),
    })
}
