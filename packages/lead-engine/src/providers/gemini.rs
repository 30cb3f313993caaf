//! Gemini implementation of the provider traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use lead_engine::providers::GeminiProvider;
//!
//! let provider = GeminiProvider::from_env()?;
//! let finder = LeadFinder::new(provider);
//! ```

use async_trait::async_trait;
use gemini_client::{ChatSession, GeminiClient, GeminiError, Tool};

use crate::error::{ProviderError, ProviderResult};
use crate::traits::provider::{ConversationProvider, ConversationSession, SessionOptions, SessionTool};

/// Gemini-backed session factory.
#[derive(Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Create a provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: GeminiClient::new(api_key),
        }
    }

    /// Wrap an already configured client.
    pub fn from_client(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Create from `GEMINI_API_KEY` (or `API_KEY`).
    pub fn from_env() -> ProviderResult<Self> {
        GeminiClient::from_env()
            .map(Self::from_client)
            .map_err(map_error)
    }

    /// Set a custom base URL (for proxies, test servers, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    pub fn client(&self) -> &GeminiClient {
        &self.client
    }
}

#[async_trait]
impl ConversationProvider for GeminiProvider {
    async fn create_session(
        &self,
        options: SessionOptions,
    ) -> ProviderResult<Box<dyn ConversationSession>> {
        if self.client.api_key().trim().is_empty() {
            return Err(ProviderError::Config("Gemini API key is empty".into()));
        }

        let mut builder = self.client.chat(options.model);
        for tool in options.tools {
            builder = match tool {
                SessionTool::LocationGrounding => builder.tool(Tool::google_maps()),
            };
        }

        Ok(Box::new(GeminiSession {
            chat: builder.build(),
        }))
    }
}

/// One Gemini conversation.
pub struct GeminiSession {
    chat: ChatSession,
}

#[async_trait]
impl ConversationSession for GeminiSession {
    async fn send_message(&mut self, text: &str) -> ProviderResult<String> {
        self.chat.send_message(text).await.map_err(map_error)
    }
}

fn map_error(err: GeminiError) -> ProviderError {
    match err {
        GeminiError::Config(m) => ProviderError::Config(m),
        GeminiError::RateLimited(m) => ProviderError::RateLimited(m),
        // The client already classified rate limits by status.
        other @ (GeminiError::Network(_) | GeminiError::Api { .. } | GeminiError::Parse(_)) => {
            ProviderError::Transport(other.to_string())
        }
    }
}
