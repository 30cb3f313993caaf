//! Provider implementations for the lead engine.
//!
//! This module provides reference implementations of the
//! `ConversationProvider` trait. Users can use these directly or
//! implement their own.

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiProvider, GeminiSession};
