//! Health check endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::dto::HealthResponse;
use crate::state::AppState;

/// GET /api/health - Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ledger: state.ledger.name().to_string(),
        model: state.generator.model().to_string(),
    })
}
