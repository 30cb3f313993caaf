//! Subscription tiers and their per-search limits.

use serde::{Deserialize, Serialize};

use crate::error::PlanLimitError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Business,
}

impl PlanTier {
    pub fn name(self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Pro => "Pro",
            PlanTier::Business => "Business",
        }
    }

    /// Most leads one search may request.
    pub fn max_leads_per_search(self) -> usize {
        match self {
            PlanTier::Free => 10,
            PlanTier::Pro => 50,
            PlanTier::Business => 100,
        }
    }

    /// Reject counts above the tier's limit.
    pub fn check_count(self, requested: usize) -> Result<usize, PlanLimitError> {
        let max = self.max_leads_per_search();
        if requested > max {
            return Err(PlanLimitError {
                plan: self.name(),
                max,
                requested,
            });
        }
        Ok(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert_eq!(PlanTier::default(), PlanTier::Free);
        assert_eq!(PlanTier::Free.check_count(10), Ok(10));
        assert_eq!(PlanTier::Business.check_count(100), Ok(100));

        let err = PlanTier::Pro.check_count(51).unwrap_err();
        assert_eq!(err.max, 50);
        assert!(err.to_string().contains("Pro plan"));
    }
}
