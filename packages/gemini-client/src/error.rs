//! Error types for Gemini client.

use thiserror::Error;

/// Result type for Gemini client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Gemini client errors.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Quota exhausted or too many requests (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// API error (non-2xx response other than rate limiting)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GeminiError {
    /// Whether this error signals upstream rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GeminiError::RateLimited(_))
    }
}
