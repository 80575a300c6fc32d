//! Network throughput endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::warn;

use crate::dto::TpsResponse;
use crate::state::AppState;

/// GET /api/network/tps - Explorer-reported transactions per second, or null.
pub async fn tps(State(state): State<Arc<AppState>>) -> Json<TpsResponse> {
    let tps = match &state.explorer {
        Some(explorer) => match explorer.tps().await {
            Ok(tps) => Some(tps),
            Err(e) => {
                warn!(error = %e, "Failed to fetch TPS");
                None
            }
        },
        None => None,
    };
    Json(TpsResponse { tps })
}
