//! Conversational provider trait.
//!
//! The engine talks to a grounded generative model through two seams:
//! a provider that opens sessions, and a session that answers messages
//! with untyped text. Sessions are stateful (the provider sees its own
//! earlier replies) and are owned by exactly one acquisition call.

use async_trait::async_trait;

use crate::error::ProviderResult;

/// Capabilities a session may be opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTool {
    /// Let the model consult a real-world places index.
    LocationGrounding,
}

/// Options for opening a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,

    /// Tools enabled for every turn
    pub tools: Vec<SessionTool>,
}

impl SessionOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            tools: Vec::new(),
        }
    }

    /// Enable a tool.
    pub fn with_tool(mut self, tool: SessionTool) -> Self {
        if !self.tools.contains(&tool) {
            self.tools.push(tool);
        }
        self
    }

    pub fn has_tool(&self, tool: SessionTool) -> bool {
        self.tools.contains(&tool)
    }
}

/// One ongoing conversation.
#[async_trait]
pub trait ConversationSession: Send {
    /// Send a message and return the raw reply text.
    ///
    /// The text is untrusted: it may be empty, fenced, or not JSON at all.
    async fn send_message(&mut self, text: &str) -> ProviderResult<String>;
}

/// Factory for sessions.
///
/// Implementations wrap specific LLM providers and must report a missing
/// credential as `ProviderError::Config` without making a network call.
#[async_trait]
pub trait ConversationProvider: Send + Sync {
    async fn create_session(
        &self,
        options: SessionOptions,
    ) -> ProviderResult<Box<dyn ConversationSession>>;
}

#[async_trait]
impl<P: ConversationProvider + ?Sized> ConversationProvider for std::sync::Arc<P> {
    async fn create_session(
        &self,
        options: SessionOptions,
    ) -> ProviderResult<Box<dyn ConversationSession>> {
        (**self).create_session(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_options_dedupes_tools() {
        let options = SessionOptions::new("m")
            .with_tool(SessionTool::LocationGrounding)
            .with_tool(SessionTool::LocationGrounding);

        assert_eq!(options.tools.len(), 1);
        assert!(options.has_tool(SessionTool::LocationGrounding));
    }
}
