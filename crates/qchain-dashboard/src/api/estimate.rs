//! Estimation endpoint.

use axum::Json;
use qchain_core::{ProviderProfile, estimate, estimate_display};

use crate::dto::{EstimateRequest, EstimateResponse};

/// POST /api/estimate - Time and cost estimate for the form's current input.
///
/// Returns the placeholder range until both a provider and some text are present.
pub async fn estimate_job(Json(req): Json<EstimateRequest>) -> Json<EstimateResponse> {
    let provider = req
        .job_type
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let Some(provider) = provider.filter(|_| !req.description.is_empty()) else {
        return Json(EstimateResponse {
            time: estimate_display(None, &req.description),
            cost: None,
            known_provider: false,
            estimate: None,
        });
    };

    let est = estimate(provider, req.description.chars().count(), req.priority);
    Json(EstimateResponse {
        time: est.time_display(),
        cost: Some(est.cost_display()),
        known_provider: ProviderProfile::is_known(provider),
        estimate: Some(est),
    })
}
