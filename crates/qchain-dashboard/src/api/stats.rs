//! Admin statistics endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::auth::CurrentSession;
use crate::dto::StatsResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/stats - Total jobs on the ledger and total users. Admin only.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    current: CurrentSession,
) -> Result<Json<StatsResponse>, ApiError> {
    current.require_admin()?;
    let total_jobs = state.ledger.job_count().await?;
    let total_users = state.users.read().await.len();
    Ok(Json(StatsResponse {
        total_jobs,
        total_users,
    }))
}
