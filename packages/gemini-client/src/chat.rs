//! Multi-turn chat sessions.
//!
//! The `generateContent` endpoint is stateless, so a session keeps the
//! conversation history itself and replays it with every message.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, Tool};
//!
//! let mut chat = client
//!     .chat("gemini-2.5-flash")
//!     .tool(Tool::google_maps())
//!     .build();
//!
//! let first = chat.send_message("List three bakeries in Austin as JSON").await?;
//! let more = chat.send_message("Three more, none repeated").await?;
//! ```

use tracing::{debug, info, warn};

use crate::types::{Content, GenerateContentRequest, GenerationConfig, Part, Tool};
use crate::{GeminiClient, Result};

/// Builder for creating a ChatSession.
pub struct ChatBuilder {
    client: GeminiClient,
    model: String,
    system_instruction: Option<String>,
    tools: Vec<Tool>,
    temperature: Option<f32>,
}

impl ChatBuilder {
    pub(crate) fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_instruction: None,
            tools: Vec::new(),
            temperature: None,
        }
    }

    /// Set the system instruction.
    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Add a tool available for every turn.
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the temperature for generation.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Build the session.
    pub fn build(self) -> ChatSession {
        ChatSession {
            client: self.client,
            model: self.model,
            system_instruction: self.system_instruction,
            tools: self.tools,
            temperature: self.temperature,
            history: Vec::new(),
        }
    }
}

/// A stateful conversation with one model.
pub struct ChatSession {
    client: GeminiClient,
    model: String,
    system_instruction: Option<String>,
    tools: Vec<Tool>,
    temperature: Option<f32>,
    history: Vec<Content>,
}

impl ChatSession {
    /// Send a user message and return the model's text reply.
    ///
    /// On success both turns are appended to the history. On failure the
    /// user turn is discarded so the history keeps alternating roles.
    pub async fn send_message(&mut self, text: impl Into<String>) -> Result<String> {
        self.history.push(Content::user(text));

        let request = self.build_request();

        info!(
            model = %self.model,
            turn = self.history.len(),
            tool_count = self.tools.len(),
            "Chat turn starting"
        );

        match self.client.generate_content(&self.model, &request).await {
            Ok(response) => {
                let reply = response.text();
                debug!(reply_len = reply.len(), "Chat turn complete");
                self.history.push(Content::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                warn!(model = %self.model, error = %e, "Chat turn failed");
                self.history.pop();
                Err(e)
            }
        }
    }

    /// Conversation so far, oldest first.
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Model this session talks to.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.history.clone(),
            tools: self.tools.clone(),
            system_instruction: self.system_instruction.as_ref().map(|s| Content {
                role: None,
                parts: vec![Part::text(s.clone())],
            }),
            generation_config: self.temperature.map(|t| GenerationConfig {
                temperature: Some(t),
                max_output_tokens: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_builder() {
        let client = GeminiClient::new("test-key");
        let chat = client
            .chat("gemini-2.5-flash")
            .system("You are a CRM importer")
            .tool(Tool::google_maps())
            .temperature(0.3)
            .build();

        assert_eq!(chat.model(), "gemini-2.5-flash");
        assert!(chat.history().is_empty());
        assert_eq!(chat.tools.len(), 1);
    }

    #[test]
    fn test_request_carries_history_and_tools() {
        let client = GeminiClient::new("test-key");
        let mut chat = client.chat("m").tool(Tool::google_maps()).build();
        chat.history.push(Content::user("first"));
        chat.history.push(Content::model("[]"));
        chat.history.push(Content::user("second"));

        let request = chat.build_request();
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.tools, vec![Tool::google_maps()]);
        assert!(request.system_instruction.is_none());
        assert!(request.generation_config.is_none());
    }
}
