//! Lead Acquisition Engine
//!
//! Collects a deduplicated list of business leads from a grounded
//! generative provider that answers in small, lossy, occasionally
//! malformed batches.
//!
//! # Guarantees
//!
//! - No two returned leads share a case-insensitive name or a non-empty address
//! - Never more than the requested count, in discovery order
//! - At most `ceil(count / 20) + 3` provider queries per call
//! - Fewer results than requested is a success; zero is an error
//!
//! # Usage
//!
//! ```rust,ignore
//! use lead_engine::{LeadFinder, providers::GeminiProvider};
//!
//! let finder = LeadFinder::new(GeminiProvider::from_env()?);
//! let leads = finder
//!     .acquire("plumbers", "Austin, TX", 25, Some(&|n| println!("{n} found")))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Provider seam (sessions and their factory)
//! - [`types`] - Leads, configuration, plan tiers
//! - [`pipeline`] - Prompts, parsing, the acquisition loop, outreach drafting
//! - [`providers`] - Provider implementations (Gemini behind the `gemini` feature)
//! - [`export`] - CSV rendering
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod export;
pub mod pipeline;
pub mod providers;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AcquireError, OutreachError, ParseError, PlanLimitError, ProviderError};
pub use traits::{ConversationProvider, ConversationSession, SessionOptions, SessionTool};
pub use types::{
    config::{AcquireConfig, DEFAULT_MODEL},
    lead::{EmailDraft, Lead, RawLead},
    plan::PlanTier,
};

// Re-export pipeline components
pub use pipeline::{
    draft_outreach_email, parse_batch, parse_email_draft, strip_code_fences, Accumulator,
    BatchQuery, LeadFinder, ProgressFn,
};

pub use export::to_csv;

#[cfg(feature = "gemini")]
pub use providers::GeminiProvider;

// Re-export testing utilities
pub use testing::{MockProvider, ScriptedReply};
