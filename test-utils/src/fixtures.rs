//! JSON fixtures shaped like real HVCA responses.

use serde_json::{Value, json};

/// Placeholder PEM certificate.
pub const SAMPLE_CERT_PEM: &str =
    "-----BEGIN CERTIFICATE-----\nMIIBfixture\n-----END CERTIFICATE-----\n";

/// Placeholder PEM public key.
pub const SAMPLE_PUBLIC_KEY_PEM: &str =
    "-----BEGIN PUBLIC KEY-----\nMIIBfixture\n-----END PUBLIC KEY-----\n";

/// Body of `GET /certificates/{serial}`.
#[must_use]
pub fn cert_info(status: &str) -> Value {
    json!({
        "certificate": SAMPLE_CERT_PEM,
        "status": status,
        "updated_at": 1_700_000_000
    })
}

/// `count` entries of a statistics listing.
#[must_use]
pub fn cert_meta_list(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "serial_number": format!("{:016X}", i + 1),
                "not_before": 1_700_000_000,
                "not_after": 1_707_776_000
            })
        })
        .collect();
    Value::Array(items)
}

/// A claim in the given state.
#[must_use]
pub fn claim(id: &str, domain: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "domain": domain,
        "created_at": 1_700_000_000,
        "expires_at": 1_731_536_000,
        "assert_by": 1_700_604_800,
        "log": []
    })
}

/// Body of claim submission and reassertion.
#[must_use]
pub fn claim_assertion(token: &str) -> Value {
    json!({ "token": token, "assert_by": 1_700_604_800 })
}

/// Body of `GET /validationpolicy`.
#[must_use]
pub fn validation_policy() -> Value {
    json!({
        "validity": {
            "secondsmin": 3_600,
            "secondsmax": 7_776_000,
            "not_before_negative_skew": 120,
            "not_before_positive_skew": 3_600
        },
        "subject_dn": {"common_name": {"presence": "REQUIRED", "format": "^.*$"}},
        "san": {"dns_names": {"static": false, "list": [], "mincount": 1, "maxcount": 10}},
        "public_key": {"key_type": "RSA", "allowed_lengths": [2048, 4096], "key_format": "PKCS8"}
    })
}

/// Body of counter and quota endpoints.
#[must_use]
pub fn counter(value: i64) -> Value {
    json!({ "value": value })
}

/// Body of `GET /claims/domains/{id}/email`.
#[must_use]
pub fn authorised_emails(domain: &str) -> Value {
    json!({
        "constructed": [format!("admin@{domain}"), format!("webmaster@{domain}")],
        "DNS": {
            "SOA": {"emails": [format!("hostmaster@{domain}")]},
            "TXT": {"emails": [], "error": "no records"}
        }
    })
}
