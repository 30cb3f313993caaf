//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the lead engine
//! without making real provider calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{ProviderError, ProviderResult};
use crate::traits::provider::{ConversationProvider, ConversationSession, SessionOptions};

/// One scripted provider reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Raw reply text (may be fenced, malformed, or empty)
    Text(String),

    /// Fail with a rate-limit error
    RateLimited,

    /// Fail with a generic transport error
    Transport(String),

    /// Fail with a configuration error (e.g., a revoked key)
    Config(String),

    /// Never answer (for cancellation tests)
    Pending,
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        ScriptedReply::Text(text.into())
    }

    /// A JSON array reply built from `serde_json::Value`s.
    pub fn json(value: serde_json::Value) -> Self {
        ScriptedReply::Text(value.to_string())
    }
}

/// A mock provider that plays back scripted replies.
///
/// All sessions share one reply queue. When the queue runs dry, sessions
/// answer with an empty string.
#[derive(Clone, Default)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    messages: Arc<Mutex<Vec<String>>>,
    sessions: Arc<Mutex<Vec<SessionOptions>>>,
    session_error: Arc<Mutex<Option<ProviderError>>>,
}

impl MockProvider {
    /// Create a new mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn with_reply(self, reply: ScriptedReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Queue a text reply.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(ScriptedReply::text(text))
    }

    /// Queue several replies.
    pub fn with_replies(self, replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        self.replies.lock().unwrap().extend(replies);
        self
    }

    /// Make `create_session` fail.
    pub fn with_session_error(self, error: ProviderError) -> Self {
        *self.session_error.lock().unwrap() = Some(error);
        self
    }

    /// Messages sent so far, across all sessions.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Number of messages sent so far.
    pub fn query_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    /// Options of every session opened so far.
    pub fn sessions(&self) -> Vec<SessionOptions> {
        self.sessions.lock().unwrap().clone()
    }

    /// Replies not yet consumed.
    pub fn remaining_replies(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl ConversationProvider for MockProvider {
    async fn create_session(
        &self,
        options: SessionOptions,
    ) -> ProviderResult<Box<dyn ConversationSession>> {
        if let Some(err) = self.session_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.sessions.lock().unwrap().push(options);
        Ok(Box::new(MockSession {
            provider: self.clone(),
        }))
    }
}

struct MockSession {
    provider: MockProvider,
}

#[async_trait]
impl ConversationSession for MockSession {
    async fn send_message(&mut self, text: &str) -> ProviderResult<String> {
        self.provider.messages.lock().unwrap().push(text.to_string());
        let reply = self.provider.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::RateLimited) => Err(ProviderError::RateLimited(
                "429 Too Many Requests".to_string(),
            )),
            Some(ScriptedReply::Transport(message)) => Err(ProviderError::Transport(message)),
            Some(ScriptedReply::Config(message)) => Err(ProviderError::Config(message)),
            Some(ScriptedReply::Pending) => std::future::pending().await,
            None => Ok(String::new()),
        }
    }
}

/// Build a JSON batch with one distinct business per index in `range`,
/// named `{prefix} {i}` with address `{i} {prefix} St`.
pub fn business_batch(prefix: &str, range: std::ops::Range<usize>) -> serde_json::Value {
    serde_json::Value::Array(
        range
            .map(|i| {
                serde_json::json!({
                    "name": format!("{prefix} {i}"),
                    "phone": format!("(555) 000-{i:04}"),
                    "website": format!("https://example.com/{i}"),
                    "address": format!("{i} {prefix} St"),
                    "rating": 4.2,
                    "reviewCount": 10 + i,
                    "description": "A local business"
                })
            })
            .collect(),
    )
}
