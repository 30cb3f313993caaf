//! Pure Gemini REST API client
//!
//! A clean, minimal client for the Gemini `generateContent` API with no
//! domain-specific logic. Supports single-shot generation, tool grounding,
//! and multi-turn chat sessions.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, GenerateContentRequest, Tool};
//!
//! let client = GeminiClient::from_env()?;
//!
//! let response = client
//!     .generate_content(
//!         "gemini-2.5-flash",
//!         &GenerateContentRequest::new("Coffee shops in Duluth, MN").tool(Tool::google_maps()),
//!     )
//!     .await?;
//! println!("{}", response.text());
//! ```
//!
//! # Chat
//!
//! ```rust,ignore
//! let mut chat = client.chat("gemini-2.5-flash").tool(Tool::google_maps()).build();
//! let reply = chat.send_message("Hello!").await?;
//! ```

pub mod chat;
pub mod error;
pub mod types;

pub use chat::{ChatBuilder, ChatSession};
pub use error::{GeminiError, Result};
pub use types::*;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `GEMINI_API_KEY` (or `API_KEY`).
    pub fn from_env() -> Result<Self> {
        let api_key = ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| GeminiError::Config("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies, test servers, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start building a multi-turn chat session with the specified model.
    pub fn chat(&self, model: impl Into<String>) -> ChatBuilder {
        ChatBuilder::new(self.clone(), model)
    }

    /// Generate content.
    ///
    /// Sends the full request (history, tools, config) and returns the raw
    /// response. Use [`GenerateContentResponse::text`] for the reply text.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Gemini API error");
            return Err(classify_error(status, error_text));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        debug!(
            model = %model,
            candidates = body.candidates.len(),
            duration_ms = start.elapsed().as_millis(),
            "Gemini generate content"
        );

        Ok(body)
    }

    /// Single-shot text generation.
    pub async fn generate_text(&self, model: &str, prompt: impl Into<String>) -> Result<String> {
        let response = self
            .generate_content(model, &GenerateContentRequest::new(prompt))
            .await?;
        Ok(response.text())
    }
}

/// Map a non-2xx response onto an error variant.
fn classify_error(status: StatusCode, body: String) -> GeminiError {
    let envelope = serde_json::from_str::<types::ErrorEnvelope>(&body).ok();
    let exhausted = envelope
        .as_ref()
        .map(|e| e.error.status == "RESOURCE_EXHAUSTED")
        .unwrap_or(false)
        || body.contains("RESOURCE_EXHAUSTED");

    let message = envelope
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
        GeminiError::RateLimited(format!("{}: {}", status.as_u16(), message))
    } else {
        GeminiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("key-test").with_base_url("https://custom.api.com/");

        assert_eq!(client.api_key, "key-test");
        assert_eq!(client.base_url, "https://custom.api.com");
    }

    #[test]
    fn test_classify_too_many_requests() {
        let err = classify_error(StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_classify_resource_exhausted_envelope() {
        let body = r#"{"error":{"code":403,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = classify_error(StatusCode::FORBIDDEN, body.into());
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_classify_other_api_error() {
        let body = r#"{"error":{"code":400,"message":"bad model","status":"INVALID_ARGUMENT"}}"#;
        match classify_error(StatusCode::BAD_REQUEST, body.into()) {
            GeminiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad model");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
