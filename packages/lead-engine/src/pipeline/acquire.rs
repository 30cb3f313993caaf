//! The acquisition loop.
//!
//! Turns one "give me N leads" request into a bounded sequence of queries
//! over a single provider session, merging and deduplicating each batch
//! until the target is reached, supply dries up, or the budget runs out.

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{AcquireError, ParseError, ProviderError, Result};
use crate::pipeline::parse::parse_batch;
use crate::pipeline::prompts::BatchQuery;
use crate::traits::provider::{ConversationProvider, SessionOptions, SessionTool};
use crate::types::config::AcquireConfig;
use crate::types::lead::{Lead, RawLead};

/// Progress callback, called with the number of leads found so far.
pub type ProgressFn<'a> = &'a (dyn Fn(usize) + Send + Sync);

/// Working state of one acquisition call.
///
/// Holds leads in discovery order and guarantees that no two share a
/// case-insensitive name or a non-empty address.
#[derive(Debug, Default)]
pub struct Accumulator {
    leads: Vec<Lead>,
    names: HashSet<String>,
    addresses: HashSet<String>,
    unproductive_streak: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    /// Consecutive batches that added nothing.
    pub fn unproductive_streak(&self) -> usize {
        self.unproductive_streak
    }

    /// Whether `lead` collides with anything already accepted.
    pub fn is_duplicate(&self, lead: &Lead) -> bool {
        self.names.contains(&lead.name_key())
            || lead
                .address_key()
                .map(|a| self.addresses.contains(a))
                .unwrap_or(false)
    }

    /// Accept `lead` unless it is a duplicate. Returns whether it was added.
    pub fn insert(&mut self, lead: Lead) -> bool {
        if self.is_duplicate(&lead) {
            return false;
        }
        self.names.insert(lead.name_key());
        if let Some(address) = lead.address_key() {
            self.addresses.insert(address.to_string());
        }
        self.leads.push(lead);
        true
    }

    /// Validate and merge a batch, preserving arrival order.
    ///
    /// Nameless entries are dropped. Each survivor gets a fresh id and is
    /// checked against everything accepted so far, including earlier
    /// entries of the same batch. Returns the number of leads added.
    pub fn merge(&mut self, batch: Vec<RawLead>) -> usize {
        batch
            .into_iter()
            .filter_map(RawLead::into_lead)
            .map(|lead| self.insert(lead))
            .filter(|added| *added)
            .count()
    }

    fn mark_productive(&mut self) {
        self.unproductive_streak = 0;
    }

    fn mark_unproductive(&mut self) -> usize {
        self.unproductive_streak += 1;
        self.unproductive_streak
    }

    /// First `limit` leads in discovery order.
    pub fn into_leads(mut self, limit: usize) -> Vec<Lead> {
        self.leads.truncate(limit);
        self.leads
    }
}

/// How one round ended.
enum Round {
    /// Keep looping.
    Continue,
    /// Stop looping and keep what we have.
    Stop,
}

/// Entry point: acquires deduplicated leads from a conversational provider.
///
/// # Example
///
/// ```rust,ignore
/// let finder = LeadFinder::new(provider);
///
/// let leads = finder
///     .acquire("plumbers", "Austin, TX", 25, Some(&|n| println!("{n} found")))
///     .await?;
/// ```
pub struct LeadFinder<P: ConversationProvider> {
    provider: P,
    config: AcquireConfig,
}

impl<P: ConversationProvider> LeadFinder<P> {
    /// Create a finder with the default policy.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: AcquireConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(provider: P, config: AcquireConfig) -> Self {
        Self { provider, config }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &AcquireConfig {
        &self.config
    }

    /// Get a reference to the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Acquire up to `target_count` leads for `term` near `location`.
    ///
    /// Returns between 1 and `target_count` leads on success. Fewer than
    /// requested is still a success; zero is [`AcquireError::NoData`].
    pub async fn acquire(
        &self,
        term: &str,
        location: &str,
        target_count: usize,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<Vec<Lead>> {
        self.acquire_with_cancel(
            term,
            location,
            target_count,
            on_progress,
            &CancellationToken::new(),
        )
        .await
    }

    /// Same as [`acquire`](Self::acquire), but stops waiting when `cancel`
    /// fires. An in-flight provider call is dropped, not awaited.
    pub async fn acquire_with_cancel(
        &self,
        term: &str,
        location: &str,
        target_count: usize,
        on_progress: Option<ProgressFn<'_>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Lead>> {
        let term = term.trim();
        let location = location.trim();
        validate_request(term, location, target_count)?;

        let budget = self.config.loop_budget(target_count);
        info!(
            term,
            location,
            target_count,
            budget,
            model = %self.config.model,
            "Starting lead acquisition"
        );

        let options = SessionOptions::new(&self.config.model).with_tool(SessionTool::LocationGrounding);
        let mut session = match self.provider.create_session(options).await {
            Ok(session) => session,
            Err(ProviderError::Config(m)) => return Err(AcquireError::Config(m)),
            Err(ProviderError::RateLimited(m)) => return Err(AcquireError::RateLimited(m)),
            Err(ProviderError::Transport(m)) => {
                warn!(error = %m, "Could not open provider session");
                return Err(AcquireError::NoData {
                    queries: 0,
                    last_error: Some(m),
                });
            }
        };

        let mut acc = Accumulator::new();
        let mut round = 0;
        let mut last_error = None;

        while acc.len() < target_count && round < budget {
            let remaining = target_count - acc.len();
            let query = BatchQuery::for_round(round, term, location, self.config.request_size(remaining));

            if round > 0 && !self.config.backoff.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(AcquireError::Cancelled),
                    _ = tokio::time::sleep(self.config.backoff) => {}
                }
            }

            debug!(round, requested = query.count(), initial = query.is_initial(), "Sending batch query");

            let message = query.render();
            let reply = tokio::select! {
                _ = cancel.cancelled() => return Err(AcquireError::Cancelled),
                reply = session.send_message(&message) => reply,
            };
            round += 1;

            let outcome = match reply {
                Ok(text) => self.absorb(&mut acc, &text, round, target_count, on_progress),
                Err(ProviderError::RateLimited(m)) => {
                    warn!(round, collected = acc.len(), "Rate limited; discarding partial results");
                    return Err(AcquireError::RateLimited(m));
                }
                Err(ProviderError::Config(m) | ProviderError::Transport(m)) => {
                    warn!(round, error = %m, collected = acc.len(), "Provider failed; keeping partial results");
                    last_error = Some(m);
                    Round::Stop
                }
            };

            if let Round::Stop = outcome {
                break;
            }
        }

        if acc.is_empty() {
            warn!(queries = round, "Acquisition found nothing");
            return Err(AcquireError::NoData {
                queries: round,
                last_error,
            });
        }

        let leads = acc.into_leads(target_count);
        info!(
            found = leads.len(),
            target_count,
            queries = round,
            "Lead acquisition complete"
        );
        Ok(leads)
    }

    /// Parse one reply and fold it into the accumulator.
    fn absorb(
        &self,
        acc: &mut Accumulator,
        text: &str,
        round: usize,
        target_count: usize,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Round {
        let batch = match parse_batch(text) {
            Ok(batch) => batch,
            Err(e) => return self.unproductive(acc, round, &e),
        };

        let received = batch.len();
        let added = acc.merge(batch);

        info!(
            round,
            received,
            added,
            total = acc.len(),
            "Batch merged"
        );

        if let Some(report) = on_progress {
            report(acc.len().min(target_count));
        }

        if added == 0 {
            let streak = acc.mark_unproductive();
            warn!(round, streak, "Batch contained no new leads");
            return self.stop_if_exhausted(streak);
        }

        acc.mark_productive();
        Round::Continue
    }

    fn unproductive(&self, acc: &mut Accumulator, round: usize, error: &ParseError) -> Round {
        let streak = acc.mark_unproductive();
        warn!(round, streak, error = %error, "Unusable batch");

        // Malformed JSON retries with a fresh query; only structurally
        // empty replies count toward stopping.
        if error.is_malformed() {
            return Round::Continue;
        }
        self.stop_if_exhausted(streak)
    }

    fn stop_if_exhausted(&self, streak: usize) -> Round {
        if streak >= self.config.unproductive_limit {
            info!(streak, "Provider appears exhausted; stopping");
            Round::Stop
        } else {
            Round::Continue
        }
    }
}

fn validate_request(term: &str, location: &str, target_count: usize) -> Result<()> {
    let reason = if term.is_empty() {
        "search term is empty"
    } else if location.is_empty() {
        "location is empty"
    } else if target_count == 0 {
        "target count must be positive"
    } else {
        return Ok(());
    };
    Err(AcquireError::InvalidRequest {
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawLead {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_insert_rejects_case_insensitive_name() {
        let mut acc = Accumulator::new();
        assert!(acc.insert(Lead::new("Blue Door Bakery")));
        assert!(!acc.insert(Lead::new("BLUE DOOR bakery")));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_insert_rejects_same_address() {
        let mut acc = Accumulator::new();
        assert!(acc.insert(Lead::new("A").with_address("1 Main St")));
        assert!(!acc.insert(Lead::new("B").with_address("1 Main St")));
        assert!(acc.insert(Lead::new("C").with_address("2 Main St")));
    }

    #[test]
    fn test_blank_addresses_never_collide() {
        let mut acc = Accumulator::new();
        assert!(acc.insert(Lead::new("A")));
        assert!(acc.insert(Lead::new("B")));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_merge_filters_nameless_and_in_batch_duplicates() {
        let mut acc = Accumulator::new();
        let added = acc.merge(vec![
            raw(json!({"name": "A", "address": "1 Main"})),
            raw(json!({"address": "nowhere"})),
            raw(json!({"name": "a"})),
            raw(json!({"name": "B", "address": "1 Main"})),
            raw(json!({"name": "C"})),
        ]);

        assert_eq!(added, 2);
        let names: Vec<_> = acc.leads().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_into_leads_truncates_in_order() {
        let mut acc = Accumulator::new();
        for name in ["A", "B", "C"] {
            acc.insert(Lead::new(name));
        }
        let leads = acc.into_leads(2);
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[1].name, "B");
    }

    #[test]
    fn test_validate_request() {
        assert!(validate_request("cafes", "Austin", 1).is_ok());
        assert!(matches!(
            validate_request("", "Austin", 1),
            Err(AcquireError::InvalidRequest { .. })
        ));
        assert!(validate_request("cafes", "", 1).is_err());
        assert!(validate_request("cafes", "Austin", 0).is_err());
    }
}
