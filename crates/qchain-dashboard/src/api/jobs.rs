//! Job history and submission endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use qchain_ai::analyse_or_skip;
use qchain_core::{AnalysisRequest, JobFilter, JobSubmission, LatestAnalysis, attach_analysis};
use tracing::{info, warn};

use crate::auth::CurrentSession;
use crate::dto::{JobListParams, JobListResponse, JobView, SubmitJobRequest, SubmitJobResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/jobs - Job history visible to the caller, newest first.
///
/// Non-admins see jobs from their connected wallet only. Admins see all jobs
/// unless `mine=true`. A ledger failure yields an empty list with `error` set.
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    current: CurrentSession,
    Query(params): Query<JobListParams>,
) -> Json<JobListResponse> {
    let session = current.session;

    let mut records = match state.ledger.fetch_jobs().await {
        Ok(records) => records,
        Err(e) => {
            warn!(ledger = state.ledger.name(), error = %e, "Failed to fetch jobs");
            return Json(JobListResponse {
                jobs: Vec::new(),
                total: 0,
                error: Some(format!("Failed to fetch job history: {e}")),
            });
        }
    };

    if let Some(latest) = session.latest_analysis {
        attach_analysis(&mut records, &latest.submitter, latest.analysis);
    }

    let filter = JobFilter::new(
        session.user.role,
        params.mine,
        session.wallet.map(|w| w.address),
    );
    let jobs: Vec<JobView> = filter
        .apply(&records)
        .into_iter()
        .map(|r| JobView::from_record(r, &state.config.network))
        .collect();

    Json(JobListResponse {
        total: jobs.len(),
        jobs,
        error: None,
    })
}

/// POST /api/jobs - Validate, analyse and log a job.
///
/// Requires a wallet connected on the configured chain. The service account
/// sends the transaction and the payload names the wallet, so the job shows up
/// as the wallet's. The analysis is optional: when the model fails the job is
/// logged as "Untitled Job".
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    current: CurrentSession,
    Json(req): Json<SubmitJobRequest>,
) -> Result<(StatusCode, Json<SubmitJobResponse>), ApiError> {
    let network = &state.config.network;
    let wallet = current
        .session
        .wallet
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("Connect your wallet to enable logging.".to_string()))?;
    if wallet.requires_switch(network) {
        return Err(ApiError::BadRequest(format!(
            "Switch your wallet to {} ({}).",
            network.chain_name,
            network.chain_id_hex()
        )));
    }

    let submission = JobSubmission::new(req.job_type, req.description, req.submission_type);
    submission.validate()?;

    let analysis = if req.analyse {
        let request = AnalysisRequest::new(&submission.description, submission.submission_type);
        analyse_or_skip(state.generator.as_ref(), &request).await
    } else {
        None
    };

    let submitter = wallet.address.clone();
    let title = submission.on_chain_title(analysis.as_ref());
    let description = submission.on_chain_description();
    let payload = submission.on_chain_payload(&submitter);
    let receipt = state.ledger.log_job(&title, &payload).await?;

    info!(
        tx = %receipt.tx_hash,
        from = %receipt.from,
        wallet = %submitter,
        user = %current.session.user.email,
        "Job logged"
    );

    if let Some(ref analysis) = analysis {
        let latest = LatestAnalysis {
            submitter: submitter.clone(),
            analysis: analysis.clone(),
        };
        state
            .update_session(&current.token, |s| s.latest_analysis = Some(latest))
            .await;
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmitJobResponse {
            tx_url: network.tx_url(&receipt.tx_hash),
            tx_hash: receipt.tx_hash,
            from: receipt.from,
            submitter,
            block_number: receipt.block_number,
            title,
            description,
            analysis,
        }),
    ))
}
