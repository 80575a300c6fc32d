//! Error types for ledger access.

use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur when reading or writing the job ledger.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body, or a placeholder when unreadable.
        body: String,
    },

    /// The node returned a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// Response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Writes need a service-account key.
    #[error("Service account private key is not configured.")]
    MissingSigningKey,

    /// Key material is not a valid secp256k1 scalar.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Transaction was mined with status 0.
    #[error("Transaction failed on-chain: {0}")]
    Reverted(String),

    /// No receipt before the configured deadline.
    #[error("Timeout waiting for receipt of {0}")]
    ReceiptTimeout(String),

    /// Simulated outage of the in-memory ledger.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_display() {
        let err = LedgerError::Rpc {
            code: -32000,
            message: "nonce too low".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("-32000"));
        assert!(msg.contains("nonce too low"));
    }

    #[test]
    fn test_missing_key_display() {
        assert!(
            LedgerError::MissingSigningKey
                .to_string()
                .contains("private key")
        );
    }

    #[test]
    fn test_reverted_display() {
        let err = LedgerError::Reverted("0xabc".into());
        assert!(err.to_string().starts_with("Transaction failed on-chain"));
    }

    #[test]
    fn test_status_display() {
        let err = LedgerError::Status {
            status: 503,
            body: "maintenance".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LedgerError = json_err.into();
        assert!(matches!(err, LedgerError::Json(_)));
    }
}
