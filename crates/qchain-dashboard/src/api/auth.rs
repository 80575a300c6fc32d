//! Login, registration and session endpoints.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::auth::CurrentSession;
use crate::dto::{CredentialsRequest, LoginResponse, MeResponse, RegisterResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/auth/login - Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .read()
        .await
        .authenticate(&req.email, &req.password)
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password.".to_string()))?;

    let token = state.open_session(user.clone()).await;
    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/auth/register - Create a regular user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .users
        .write()
        .await
        .register(&req.email, &req.password)?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user })))
}

/// POST /api/auth/logout - Destroy the caller's session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    current: CurrentSession,
) -> Json<serde_json::Value> {
    state.close_session(&current.token).await;
    info!(email = %current.session.user.email, "Logged out");
    Json(serde_json::json!({ "logged_out": true }))
}

/// GET /api/auth/me - The caller's session.
pub async fn me(current: CurrentSession) -> Json<MeResponse> {
    let session = current.session;
    Json(MeResponse {
        user: session.user,
        wallet: session.wallet.map(|w| w.address),
        logged_in_at: session.created_at,
    })
}
