//! Error types for text generation.

use thiserror::Error;

/// Result type for text-generation calls.
pub type AiResult<T> = Result<T, AiError>;

/// Errors that can occur when calling the generative model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    /// No API key configured.
    #[error("Generative AI API key not found. Set QCHAIN_AI_API_KEY or GEMINI_API_KEY.")]
    MissingApiKey,

    /// API key contains characters that cannot go into a header.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error.
    #[error("Generative AI API error ({status}): {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The model produced no candidate text.
    #[error("Model returned no content")]
    EmptyResponse,

    /// The model output does not fit the expected schema.
    #[error("Unexpected model output: {0}")]
    InvalidOutput(String),

    /// Generator deliberately configured to fail.
    #[error("Text generation unavailable: {0}")]
    Unavailable(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_display() {
        assert!(AiError::MissingApiKey.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_api_error_display() {
        let err = AiError::Api {
            status: 429,
            message: "Resource exhausted".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("Resource exhausted"));
    }

    #[test]
    fn test_invalid_output_display() {
        let err = AiError::InvalidOutput("missing field `title`".into());
        assert!(err.to_string().contains("title"));
    }
}
