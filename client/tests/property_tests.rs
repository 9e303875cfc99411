//! Property-based tests for response decoding and error classification.

use hvca_client::{
    ApiError, CertificateRequest, Executor, HvcaConfig, HvcaError, Reply, Validity, decode,
};
use hvca_test_utils::{
    TEST_API_KEY, TEST_API_SECRET, bad_total_count_strategy, claim_id_strategy, domain_strategy,
    fatal_status_strategy, location_strategy, retry_config_strategy, retryable_status_strategy,
};
use proptest::prelude::*;
use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};

fn reply(status: u16, headers: &[(&'static str, &str)], body: &[u8]) -> Reply {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    Reply {
        status: StatusCode::from_u16(status).unwrap(),
        headers: map,
        body: body.to_vec(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_location_yields_last_segment(
        (id, location) in claim_id_strategy()
            .prop_flat_map(|id| (Just(id.clone()), location_strategy(id)))
    ) {
        let reply = reply(201, &[("location", location.as_str())], b"");
        prop_assert_eq!(decode::location_id(&reply).unwrap(), id);
    }

    #[test]
    fn prop_total_count_round_trips(total in any::<u64>()) {
        let total_header = total.to_string();
        let reply = reply(
            200,
            &[("total-count", total_header.as_str()), ("content-type", "application/json")],
            b"[]",
        );
        let page = decode::page::<String>(&reply).unwrap();
        prop_assert_eq!(page.total, total);
        prop_assert!(page.items.is_empty());
    }

    #[test]
    fn prop_bad_total_count_is_rejected(raw in bad_total_count_strategy()) {
        let reply = reply(200, &[("total-count", raw.as_str())], b"[]");
        prop_assert!(matches!(decode::total_count(&reply), Err(HvcaError::TotalCount(_))));
    }

    #[test]
    fn prop_problem_body_sets_description(
        status in fatal_status_strategy(),
        description in "[a-zA-Z0-9 ]{1,40}",
    ) {
        let body = serde_json::json!({"description": description}).to_string();
        let reply = reply(status, &[("content-type", "application/problem+json")], body.as_bytes());
        prop_assert_eq!(decode::api_error(&reply), ApiError::new(status, description));
    }

    #[test]
    fn prop_non_problem_body_is_unknown(status in fatal_status_strategy(), body in ".{0,40}") {
        let reply = reply(status, &[("content-type", "text/html")], body.as_bytes());
        prop_assert_eq!(decode::api_error(&reply), ApiError::unknown(status));
    }

    #[test]
    fn prop_only_accepted_and_unavailable_are_retryable(
        retryable in retryable_status_strategy(),
        fatal in fatal_status_strategy(),
    ) {
        prop_assert!(HvcaError::from(ApiError::unknown(retryable)).is_retryable());
        prop_assert!(!HvcaError::from(ApiError::unknown(fatal)).is_retryable());
    }

    #[test]
    fn prop_dns_names_land_in_san(domain in domain_strategy()) {
        let request = CertificateRequest::new(Validity { not_before: 0, not_after: 0 })
            .with_common_name(domain.clone())
            .with_dns_name(domain.clone());
        let wire = serde_json::to_value(&request).unwrap();
        prop_assert_eq!(&wire["san"]["dns_names"][0], &serde_json::json!(domain));
        prop_assert_eq!(&wire["subject_dn"]["common_name"], &serde_json::json!(domain));
    }

    #[test]
    fn prop_executor_keeps_configured_retry(retry in retry_config_strategy()) {
        let config = HvcaConfig::new("https://hvca.example.com/v2", TEST_API_KEY, TEST_API_SECRET)
            .with_retry(retry);
        let executor = Executor::new(&config).unwrap();
        prop_assert_eq!(executor.retry_config(), retry);
        prop_assert_eq!(executor.retry_config().budget().remaining(), retry.max_retries);
    }
}
