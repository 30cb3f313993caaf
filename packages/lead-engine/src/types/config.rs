//! Configuration for the acquisition loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default provider model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Tuning for [`LeadFinder`](crate::pipeline::LeadFinder).
///
/// The defaults are the production policy; override them only when
/// embedding the engine against a different provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquireConfig {
    /// Model identifier passed to the provider.
    pub model: String,

    /// Most records requested in one turn.
    ///
    /// Large single-shot counts degrade accuracy for this class of
    /// provider. Default: 20.
    pub batch_ceiling: usize,

    /// Extra records requested beyond what is still missing, to absorb
    /// duplicates. Default: 5.
    pub surplus: usize,

    /// Rounds allowed beyond `ceil(target / batch_ceiling)`. Default: 3.
    pub extra_rounds: usize,

    /// Pause before every query after the first. Default: 800ms.
    #[serde(with = "duration_millis")]
    pub backoff: Duration,

    /// Consecutive unproductive batches that stop the loop. Default: 2.
    pub unproductive_limit: usize,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            batch_ceiling: 20,
            surplus: 5,
            extra_rounds: 3,
            backoff: Duration::from_millis(800),
            unproductive_limit: 2,
        }
    }
}

impl AcquireConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the pause between queries.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Maximum number of queries for a target count.
    pub fn loop_budget(&self, target: usize) -> usize {
        target.div_ceil(self.batch_ceiling.max(1)) + self.extra_rounds
    }

    /// Records to ask for when `remaining` are still missing.
    pub fn request_size(&self, remaining: usize) -> usize {
        (remaining + self.surplus).min(self.batch_ceiling.max(1))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
