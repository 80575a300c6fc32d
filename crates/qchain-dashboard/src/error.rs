//! Error types for the dashboard API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qchain_ai::AiError;
use qchain_core::CoreError;
use qchain_ledger::LedgerError;
use serde::Serialize;
use tracing::warn;

/// API error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Ledger node, explorer or text-generation service failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_kind();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UserExists(_) => ApiError::Conflict(e.to_string()),
            CoreError::Io(_) | CoreError::Serialization(_) => ApiError::Internal(e.to_string()),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::MissingSigningKey | LedgerError::InvalidKey(_) => {
                ApiError::Internal(e.to_string())
            }
            _ => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::MissingApiKey | AiError::InvalidApiKey => ApiError::Internal(e.to_string()),
            _ => ApiError::Upstream(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let conflict: ApiError = CoreError::UserExists("a@b.c".into()).into();
        assert!(matches!(conflict, ApiError::Conflict(_)));

        let invalid: ApiError = CoreError::Validation("too short".into()).into();
        assert_eq!(invalid.status_and_kind().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_ledger_error_mapping() {
        let reverted: ApiError = LedgerError::Reverted("0xabc".into()).into();
        assert_eq!(reverted.status_and_kind(), (StatusCode::BAD_GATEWAY, "upstream_error"));

        let no_key: ApiError = LedgerError::MissingSigningKey.into();
        assert_eq!(no_key.status_and_kind().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(no_key.to_string().contains("Service account private key"));
    }

    #[test]
    fn test_ai_error_mapping() {
        let api: ApiError = AiError::Api {
            status: 503,
            message: "overloaded".into(),
        }
        .into();
        assert_eq!(api.status_and_kind().0, StatusCode::BAD_GATEWAY);
        assert!(api.to_string().contains("overloaded"));
    }
}
