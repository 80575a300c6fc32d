//! Bearer-token session extraction.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};

use crate::error::ApiError;
use crate::state::{AppState, Session};

/// The caller's session, resolved from `Authorization: Bearer <token>`.
///
/// Handlers taking this extractor reject anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub session: Session,
}

impl CurrentSession {
    /// Require the admin role.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.session.user.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin role required".to_string()))
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let session = state
            .session(token)
            .await
            .ok_or_else(|| ApiError::Unauthorized("Session expired or unknown".to_string()))?;

        Ok(Self {
            token: token.to_string(),
            session,
        })
    }
}
