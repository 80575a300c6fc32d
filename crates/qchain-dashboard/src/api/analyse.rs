//! AI analysis endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};
use qchain_core::{AnalysisRequest, AnalysisResult};
use tracing::debug;

use crate::auth::CurrentSession;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/analyse - Analyse a submission without logging it.
///
/// Unlike job submission, a model failure is reported (502).
pub async fn analyse(
    State(state): State<Arc<AppState>>,
    _current: CurrentSession,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    if req.user_input.trim().is_empty() {
        return Err(ApiError::BadRequest("Input cannot be empty.".to_string()));
    }
    debug!(kind = %req.submission_type, len = req.user_input.len(), "Analysing submission");
    let result = state.generator.analyse(&req).await?;
    Ok(Json(result))
}
