//! Trait abstractions for pluggable components.

pub mod provider;

pub use provider::{ConversationProvider, ConversationSession, SessionOptions, SessionTool};
