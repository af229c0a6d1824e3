//! Retry delay computation for full-screen unit loads.
//!
//! Wraps a [`RetryPolicy`] with the exponential schedule the orchestrator
//! uses between load attempts. The banner does not use this module; its
//! retries run on a fixed, unbounded schedule.

use core_runtime::config::RetryPolicy;
use std::time::Duration;

/// Exponential backoff schedule derived from a [`RetryPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct BackoffSchedule {
    policy: RetryPolicy,
}

impl BackoffSchedule {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Delay before retry number `attempt` (0-based):
    /// `initial_delay * multiplier^attempt`, capped at
    /// [`RetryPolicy::MAX_DELAY`].
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.policy.multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let millis = self.policy.initial_delay.as_millis() as f64 * factor;
        let capped = millis.min(RetryPolicy::MAX_DELAY.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Whether `failures` accumulated load failures exhaust the budget.
    pub fn is_exhausted(&self, failures: u32) -> bool {
        failures >= self.policy.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_grow_exponentially() {
        let schedule = BackoffSchedule::new(RetryPolicy {
            initial_delay: Duration::from_secs(2),
            multiplier: 2.0,
            max_attempts: 5,
        });

        assert_eq!(schedule.delay_for(0), Duration::from_secs(2));
        assert_eq!(schedule.delay_for(1), Duration::from_secs(4));
        assert_eq!(schedule.delay_for(2), Duration::from_secs(8));
        assert_eq!(schedule.delay_for(3), Duration::from_secs(16));
    }

    #[test]
    fn delay_is_capped() {
        let schedule = BackoffSchedule::new(RetryPolicy {
            initial_delay: Duration::from_secs(10),
            multiplier: 10.0,
            max_attempts: 10,
        });

        assert_eq!(schedule.delay_for(5), RetryPolicy::MAX_DELAY);
    }

    #[test]
    fn unit_multiplier_gives_fixed_delay() {
        let schedule = BackoffSchedule::new(RetryPolicy {
            initial_delay: Duration::from_secs(3),
            multiplier: 1.0,
            max_attempts: 3,
        });

        assert_eq!(schedule.delay_for(0), Duration::from_secs(3));
        assert_eq!(schedule.delay_for(7), Duration::from_secs(3));
    }

    #[test]
    fn exhaustion_threshold() {
        let schedule = BackoffSchedule::new(RetryPolicy {
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_attempts: 3,
        });

        assert!(!schedule.is_exhausted(2));
        assert!(schedule.is_exhausted(3));
        assert!(schedule.is_exhausted(4));
    }
}
