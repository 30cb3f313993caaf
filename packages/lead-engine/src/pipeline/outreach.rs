//! Single-shot outreach email drafting.
//!
//! The same query/parse primitive as acquisition, with one request and one
//! JSON-object reply: no loop, no dedup, no grounding tool.

use tracing::{info, warn};

use crate::error::OutreachError;
use crate::pipeline::parse::parse_email_draft;
use crate::pipeline::prompts::format_outreach_prompt;
use crate::traits::provider::{ConversationProvider, SessionOptions};
use crate::types::config::AcquireConfig;
use crate::types::lead::EmailDraft;

/// Draft a cold outreach email for one business.
pub async fn draft_outreach_email<P: ConversationProvider + ?Sized>(
    provider: &P,
    business_name: &str,
    industry: &str,
    location: &str,
    config: &AcquireConfig,
) -> Result<EmailDraft, OutreachError> {
    info!(business = business_name, industry, location, "Drafting outreach email");

    let mut session = provider
        .create_session(SessionOptions::new(&config.model))
        .await?;

    let prompt = format_outreach_prompt(business_name.trim(), industry.trim(), location.trim());
    let reply = session.send_message(&prompt).await?;

    parse_email_draft(&reply).map_err(|e| {
        warn!(business = business_name, error = %e, "Unusable email draft");
        OutreachError::Parse(e)
    })
}
