//! Property-based tests for hvca-common crate.
//!
//! These tests verify universal properties across all inputs using proptest.

use hvca_common::{PlatformError, RetryConfig};
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A budget yields exactly `max_retries` delays, each growing linearly,
    /// and their sum matches `total_backoff`.
    #[test]
    fn prop_budget_is_linear_and_bounded(
        max_retries in 0u32..20,
        wait_ms in 0u64..5_000,
    ) {
        let config = RetryConfig::default()
            .with_max_retries(max_retries)
            .with_wait(Duration::from_millis(wait_ms));
        let mut budget = config.budget();

        let mut delays = Vec::new();
        while let Some(delay) = budget.next_delay() {
            delays.push(delay);
        }

        prop_assert_eq!(delays.len(), max_retries as usize);
        for (i, delay) in delays.iter().enumerate() {
            prop_assert_eq!(*delay, Duration::from_millis(wait_ms * (i as u64 + 1)));
        }
        let sum: Duration = delays.iter().sum();
        prop_assert_eq!(sum, config.total_backoff());
        prop_assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn prop_invalid_input_is_not_context_error(msg in "[a-zA-Z0-9 ]{1,50}") {
        let err = PlatformError::invalid_input(msg.clone());
        prop_assert!(!err.is_context_error());
        prop_assert!(err.to_string().contains(&msg));
    }
}
