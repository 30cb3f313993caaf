//! Acquisition pipeline - the core of the library.
//!
//! The pipeline covers:
//! - Query construction (initial vs. continuation)
//! - The validated-parse boundary for provider replies
//! - The batch loop with dedup and stop rules
//! - Single-shot outreach drafting

pub mod acquire;
pub mod outreach;
pub mod parse;
pub mod prompts;

pub use acquire::{Accumulator, LeadFinder, ProgressFn};
pub use outreach::draft_outreach_email;
pub use parse::{parse_batch, parse_email_draft, strip_code_fences};
pub use prompts::{
    format_outreach_prompt, BatchQuery, BATCH_OUTPUT_RULES, CONTINUATION_BATCH_PROMPT,
    INITIAL_BATCH_PROMPT, OUTREACH_EMAIL_PROMPT,
};
