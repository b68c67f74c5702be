//! Retry policy.
//!
//! The backoff schedule is unjittered exponential doubling over a fixed
//! 50ms base unit: `2^attempt * 50ms`. The budget counts retries, not
//! total sends; a budget of zero means the first non-success outcome is
//! terminal regardless of classification, and [`RetryBudget::Unlimited`]
//! leaves the loop bounded only by cancellation.

use std::time::Duration;

/// How many retries a call may spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryBudget {
    /// At most this many retries after the initial attempt.
    Limited(u32),
    /// Keep retrying until cancelled.
    Unlimited,
}

/// Retry configuration for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// The retry budget.
    pub budget: RetryBudget,
    /// The backoff base unit.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            budget: RetryBudget::Limited(3),
            base_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            budget: RetryBudget::Limited(0),
            ..Self::default()
        }
    }

    /// A policy bounded only by cancellation.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            budget: RetryBudget::Unlimited,
            ..Self::default()
        }
    }

    /// Returns `true` once `attempt` retries have used up the budget.
    #[must_use]
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        match self.budget {
            RetryBudget::Limited(max) => attempt >= max,
            RetryBudget::Unlimited => false,
        }
    }

    /// The backoff delay before retry number `attempt + 1`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_double_delay_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(50));
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    }

    #[test]
    fn test_should_exhaust_limited_budget() {
        let policy = RetryPolicy::default();
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));

        assert!(RetryPolicy::none().is_exhausted(0));
        assert!(!RetryPolicy::unlimited().is_exhausted(u32::MAX));
    }
}
