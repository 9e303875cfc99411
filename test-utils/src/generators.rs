//! Shared proptest generators for the HVCA client crates.

use hvca_common::RetryConfig;
use proptest::prelude::*;
use std::time::Duration;

/// Hex certificate serial numbers as HVCA returns them.
pub fn serial_number_strategy() -> impl Strategy<Value = String> {
    "[0-9A-F]{16,40}"
}

/// Opaque claim identifiers.
pub fn claim_id_strategy() -> impl Strategy<Value = String> {
    "[0-9A-Za-z]{8,32}"
}

/// Fully qualified DNS names.
pub fn domain_strategy() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9-]{0,14}", "[a-z]{2,6}").prop_map(|(label, tld)| format!("{label}.{tld}"))
}

/// Statuses the executor retries with backoff.
pub fn retryable_status_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![Just(202u16), Just(503u16)]
}

/// Non-success statuses that end a call immediately.
pub fn fatal_status_strategy() -> impl Strategy<Value = u16> {
    (300u16..600).prop_filter("not retried or re-authenticated", |s| {
        !matches!(s, 401 | 503)
    })
}

/// `Location` header values ending in `id`, with optional trailing slash,
/// query or fragment.
pub fn location_strategy(id: String) -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just(String::new()),
            Just("https://emea.api.hvca.globalsign.com:8443".to_string())
        ],
        prop_oneof![Just("/v2/certificates"), Just("/v2/claims/domains")],
        any::<bool>(),
        prop_oneof![Just(""), Just("?x=1"), Just("#frag")],
    )
        .prop_map(move |(host, prefix, slash, suffix)| {
            let trailing = if slash { "/" } else { "" };
            format!("{host}{prefix}/{id}{trailing}{suffix}")
        })
}

/// Values that are not valid `Total-Count` headers.
pub fn bad_total_count_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("-1".to_string()),
        "[a-z]{1,8}",
        "[0-9]{1,5}\\.[0-9]{1,3}",
    ]
}

/// Retry settings with small waits.
pub fn retry_config_strategy() -> impl Strategy<Value = RetryConfig> {
    (0u32..10, 0u64..2_000).prop_map(|(max_retries, wait_ms)| {
        RetryConfig::default()
            .with_max_retries(max_retries)
            .with_wait(Duration::from_millis(wait_ms))
    })
}
