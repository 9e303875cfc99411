//! Certificate request and certificate metadata types.

use super::from_unix;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Requested validity period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    /// Start, Unix seconds
    pub not_before: i64,
    /// End, Unix seconds; zero lets the policy choose the maximum
    pub not_after: i64,
}

impl Validity {
    /// Validity between two instants.
    #[must_use]
    pub fn between(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        Self {
            not_before: not_before.timestamp(),
            not_after: not_after.timestamp(),
        }
    }

    /// Validity starting at `not_before` and lasting `lifetime`.
    #[must_use]
    pub fn starting(not_before: DateTime<Utc>, lifetime: Duration) -> Self {
        let secs = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        Self {
            not_before: not_before.timestamp(),
            not_after: not_before.timestamp().saturating_add(secs),
        }
    }
}

/// An OID with its string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidAndValue {
    /// Dotted OID
    pub r#type: String,
    /// Attribute value
    pub value: String,
}

/// Subject distinguished name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinguishedName {
    /// CN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ST
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// L
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// street
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    /// O
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// OU
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizational_unit: Vec<String>,
    /// emailAddress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// serialNumber
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Additional attributes by OID
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_attributes: Vec<OidAndValue>,
}

/// Subject alternative names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectAltNames {
    /// dNSName entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_names: Vec<String>,
    /// rfc822Name entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    /// iPAddress entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<String>,
    /// uniformResourceIdentifier entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<String>,
    /// otherName entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_names: Vec<OidAndValue>,
}

/// Body of `POST /certificates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequest {
    /// Requested validity
    pub validity: Validity,
    /// Subject DN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_dn: Option<DistinguishedName>,
    /// Subject alternative names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san: Option<SubjectAltNames>,
    /// Extended key usage OIDs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extended_key_usages: Vec<String>,
    /// PEM public key, when no CSR is supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Proof of possession over the public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_signature: Option<String>,
    /// PEM PKCS#10 request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csr: Option<String>,
}

impl CertificateRequest {
    /// A request with only a validity period.
    #[must_use]
    pub const fn new(validity: Validity) -> Self {
        Self {
            validity,
            subject_dn: None,
            san: None,
            extended_key_usages: Vec::new(),
            public_key: None,
            public_key_signature: None,
            csr: None,
        }
    }

    /// Set the subject common name.
    #[must_use]
    pub fn with_common_name(mut self, cn: impl Into<String>) -> Self {
        self.subject_dn.get_or_insert_with(DistinguishedName::default).common_name = Some(cn.into());
        self
    }

    /// Add a dNSName SAN.
    #[must_use]
    pub fn with_dns_name(mut self, name: impl Into<String>) -> Self {
        self.san
            .get_or_insert_with(SubjectAltNames::default)
            .dns_names
            .push(name.into());
        self
    }

    /// Use a PEM public key.
    #[must_use]
    pub fn with_public_key(mut self, pem: impl Into<String>) -> Self {
        self.public_key = Some(pem.into());
        self
    }

    /// Use a PEM CSR.
    #[must_use]
    pub fn with_csr(mut self, pem: impl Into<String>) -> Self {
        self.csr = Some(pem.into());
        self
    }
}

/// Certificate status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertStatus {
    /// Issued and not revoked
    Issued,
    /// Revoked
    Revoked,
}

/// Response of `GET /certificates/{serial}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertInfo {
    /// PEM certificate
    pub certificate: String,
    /// Current status
    pub status: CertStatus,
    /// Last status change, Unix seconds
    pub updated_at: i64,
}

impl CertInfo {
    /// Last status change.
    #[must_use]
    pub fn updated_at_time(&self) -> Option<DateTime<Utc>> {
        from_unix(self.updated_at)
    }
}

/// Entry of the statistics listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertMeta {
    /// Serial number, hex
    pub serial_number: String,
    /// Start of validity, Unix seconds
    pub not_before: i64,
    /// End of validity, Unix seconds
    pub not_after: i64,
}

impl CertMeta {
    /// Start of validity.
    #[must_use]
    pub fn not_before_time(&self) -> Option<DateTime<Utc>> {
        from_unix(self.not_before)
    }

    /// End of validity.
    #[must_use]
    pub fn not_after_time(&self) -> Option<DateTime<Utc>> {
        from_unix(self.not_after)
    }
}

/// RFC 5280 revocation reasons accepted by HVCA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    /// unspecified
    Unspecified,
    /// keyCompromise
    KeyCompromise,
    /// affiliationChanged
    AffiliationChanged,
    /// superseded
    Superseded,
    /// cessationOfOperation
    CessationOfOperation,
    /// privilegeWithdrawn
    PrivilegeWithdrawn,
}

/// Body of `PATCH /certificates/{serial}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRequest {
    /// Reason
    pub revocation_reason: RevocationReason,
    /// Effective time, Unix seconds; omitted means now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_time: Option<i64>,
}
