//! Typed errors for the lead engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that end an acquisition call.
///
/// Only these reach the caller. Malformed or empty batches and
/// non-rate-limit transport failures degrade to a shorter result instead.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Provider credential missing or unusable. Raised before any query.
    #[error("configuration error: {0}")]
    Config(String),

    /// Request rejected before any provider call
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Upstream rate limit. Partial results are discarded.
    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    /// Loop ended with nothing accumulated
    #[error("no data received after {queries} queries")]
    NoData {
        queries: usize,
        last_error: Option<String>,
    },

    /// The caller stopped waiting
    #[error("operation cancelled")]
    Cancelled,
}

/// Errors surfaced by a conversational provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Credential missing or invalid
    #[error("provider configuration error: {0}")]
    Config(String),

    /// Quota exhausted or too many requests
    #[error("provider rate limit: {0}")]
    RateLimited(String),

    /// Any other failure (network, 5xx, unexpected payload)
    #[error("provider transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Classify an untyped error message.
    ///
    /// Messages carrying a 429 status, `RESOURCE_EXHAUSTED`, or the words
    /// "rate limit" are rate limits; everything else is a transport error.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("429")
            || lower.contains("resource_exhausted")
            || lower.contains("rate limit")
        {
            ProviderError::RateLimited(message)
        } else {
            ProviderError::Transport(message)
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_))
    }
}

/// Why a provider reply could not be used as a batch.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reply text was empty (or only a code fence)
    #[error("empty response")]
    Empty,

    /// Reply was not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Valid JSON of the wrong shape
    #[error("expected {expected}, got {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A JSON array with no elements
    #[error("empty array")]
    EmptyArray,

    /// A required field was absent or blank
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

impl ParseError {
    /// Malformed JSON retries immediately; structural emptiness counts
    /// toward the stop rule.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ParseError::InvalidJson(_))
    }
}

/// Errors from drafting an outreach email.
#[derive(Debug, Error)]
pub enum OutreachError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("could not parse email draft: {0}")]
    Parse(#[from] ParseError),
}

impl From<ProviderError> for OutreachError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Config(m) => OutreachError::Config(m),
            ProviderError::RateLimited(m) => OutreachError::RateLimited(m),
            ProviderError::Transport(m) => OutreachError::Provider(m),
        }
    }
}

/// A requested count above what the plan allows.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{plan} plan allows at most {max} leads per search (requested {requested})")]
pub struct PlanLimitError {
    pub plan: &'static str,
    pub max: usize,
    pub requested: usize,
}

/// Result type alias for acquisition.
pub type Result<T> = std::result::Result<T, AcquireError>;

/// Result type alias for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
