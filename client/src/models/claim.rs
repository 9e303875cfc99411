//! Domain-control claim types.

use super::from_unix;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Verification state of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Waiting for domain control to be asserted
    Pending,
    /// Domain control verified
    Verified,
}

impl ClaimStatus {
    /// Value of the `status` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
        }
    }
}

/// Outcome recorded in a claim log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimLogStatus {
    /// Verification attempt succeeded
    Success,
    /// Verification attempt failed
    Error,
}

/// One verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLogEntry {
    /// Outcome
    pub status: ClaimLogStatus,
    /// Details
    pub description: String,
    /// When, Unix seconds
    pub timestamp: i64,
}

/// A domain-control claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim identifier
    pub id: String,
    /// Verification state
    pub status: ClaimStatus,
    /// Claimed domain
    pub domain: String,
    /// Creation, Unix seconds
    pub created_at: i64,
    /// Expiry, Unix seconds
    pub expires_at: i64,
    /// Deadline for asserting control, Unix seconds
    pub assert_by: i64,
    /// Verification attempts
    #[serde(default)]
    pub log: Vec<ClaimLogEntry>,
}

impl Claim {
    /// Expiry time.
    #[must_use]
    pub fn expires_at_time(&self) -> Option<DateTime<Utc>> {
        from_unix(self.expires_at)
    }

    /// Deadline for asserting control.
    #[must_use]
    pub fn assert_by_time(&self) -> Option<DateTime<Utc>> {
        from_unix(self.assert_by)
    }
}

/// Token to publish for a new or reasserted claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAssertionInfo {
    /// Value to place in DNS, on the web server, or to confirm by email
    pub token: String,
    /// Deadline, Unix seconds
    pub assert_by: i64,
    /// Claim identifier, taken from the `Location` header
    #[serde(skip)]
    pub id: String,
}

/// Scheme used for HTTP domain validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpScheme {
    /// http
    Http,
    /// https
    Https,
}

/// Email addresses found in one DNS record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsEmails {
    /// Addresses
    #[serde(default)]
    pub emails: Vec<String>,
    /// Lookup error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Addresses HVCA accepts for email domain validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorisedEmails {
    /// Constructed addresses such as `admin@domain`
    #[serde(default)]
    pub constructed: Vec<String>,
    /// Addresses discovered in DNS, by record type
    #[serde(default, rename = "DNS")]
    pub dns: BTreeMap<String, DnsEmails>,
}

#[derive(Serialize)]
pub(crate) struct DnsAssertion<'a> {
    pub authorization_domain: &'a str,
}

#[derive(Serialize)]
pub(crate) struct HttpAssertion<'a> {
    pub authorization_domain: &'a str,
    pub scheme: HttpScheme,
}

#[derive(Serialize)]
pub(crate) struct EmailAssertion<'a> {
    pub email_address: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claim_decodes() {
        let claim: Claim = serde_json::from_value(json!({
            "id": "abc",
            "status": "VERIFIED",
            "domain": "example.com.",
            "created_at": 1,
            "expires_at": 2,
            "assert_by": 3,
            "log": [{"status": "SUCCESS", "description": "ok", "timestamp": 4}]
        }))
        .unwrap();

        assert_eq!(claim.status, ClaimStatus::Verified);
        assert_eq!(claim.log[0].status, ClaimLogStatus::Success);
    }

    #[test]
    fn test_assertion_info_ignores_id_on_wire() {
        let info: ClaimAssertionInfo =
            serde_json::from_value(json!({"token": "t", "assert_by": 9})).unwrap();
        assert_eq!(info.id, "");
    }

    #[test]
    fn test_authorised_emails_decodes() {
        let emails: AuthorisedEmails = serde_json::from_value(json!({
            "constructed": ["admin@example.com"],
            "DNS": {"SOA": {"emails": ["hostmaster@example.com"]}}
        }))
        .unwrap();
        assert_eq!(emails.dns["SOA"].emails, vec!["hostmaster@example.com"]);
    }

    #[test]
    fn test_http_assertion_wire_format() {
        let body = HttpAssertion {
            authorization_domain: "example.com",
            scheme: HttpScheme::Https,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"authorization_domain": "example.com", "scheme": "https"})
        );
    }
}
