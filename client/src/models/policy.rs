//! Validation policy returned by `GET /validationpolicy`.
//!
//! Only the validity section is typed. The other sections are kept as raw
//! JSON; the client does not interpret or validate them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Bounds on the validity period of issued certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPolicy {
    /// Minimum lifetime, seconds
    pub secondsmin: i64,
    /// Maximum lifetime, seconds
    pub secondsmax: i64,
    /// Allowed backdating of not_before, seconds
    #[serde(default)]
    pub not_before_negative_skew: i64,
    /// Allowed forward dating of not_before, seconds
    #[serde(default)]
    pub not_before_positive_skew: i64,
}

/// Account validation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Validity bounds
    pub validity: ValidityPolicy,
    /// Subject DN rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_dn: Option<Value>,
    /// SAN rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san: Option<Value>,
    /// Extended key usage rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_key_usages: Option<Value>,
    /// Public key rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<Value>,
    /// Any remaining sections
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl Policy {
    /// True when `lifetime_secs` is within the policy's validity bounds.
    #[must_use]
    pub const fn allows_lifetime(&self, lifetime_secs: i64) -> bool {
        lifetime_secs >= self.validity.secondsmin && lifetime_secs <= self.validity.secondsmax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_keeps_unknown_sections() {
        let policy: Policy = serde_json::from_value(json!({
            "validity": {"secondsmin": 60, "secondsmax": 7_776_000},
            "subject_dn": {"common_name": {"presence": "REQUIRED"}},
            "custom_extensions": {}
        }))
        .unwrap();

        assert_eq!(policy.validity.secondsmax, 7_776_000);
        assert!(policy.subject_dn.is_some());
        assert!(policy.other.contains_key("custom_extensions"));
        assert!(policy.allows_lifetime(3_600));
        assert!(!policy.allows_lifetime(30));
    }
}
