//! Error types for the core crate.

use thiserror::Error;

/// Errors raised by domain validation and local persistence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Not a 20-byte hex address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Submission or registration input rejected.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Registration with an email that is already taken.
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Unknown role name.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Unknown submission type.
    #[error("Unknown submission type: {0}")]
    UnknownSubmissionType(String),

    /// File system error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
