//! Retry budget with linear backoff.
//!
//! A budget is scoped to one logical operation. Each retryable failure
//! consumes one unit and yields the wait before the next attempt, growing
//! linearly with the number of retries already used.

use std::time::Duration;

/// Retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Base wait, multiplied by the retry number
    pub wait: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            wait: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with custom max retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Create a new retry config with custom base wait.
    #[must_use]
    pub const fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Wait before retry number `retry` (1-based).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.wait.saturating_mul(retry)
    }

    /// Total time slept when every retry in the budget is used.
    #[must_use]
    pub fn total_backoff(&self) -> Duration {
        (1..=self.max_retries).fold(Duration::ZERO, |acc, n| {
            acc.saturating_add(self.delay_for_retry(n))
        })
    }

    /// Start a fresh budget for one operation.
    #[must_use]
    pub const fn budget(&self) -> RetryBudget {
        RetryBudget {
            config: *self,
            used: 0,
        }
    }
}

/// Per-operation retry counter.
#[derive(Debug, Clone)]
pub struct RetryBudget {
    config: RetryConfig,
    used: u32,
}

impl RetryBudget {
    /// Consume one retry and return the wait before it, or `None` when the
    /// budget is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.used >= self.config.max_retries {
            return None;
        }
        self.used += 1;
        Some(self.config.delay_for_retry(self.used))
    }

    /// Retries consumed so far.
    #[must_use]
    pub const fn used(&self) -> u32 {
        self.used
    }

    /// Retries still available.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.config.max_retries - self.used
    }
}
