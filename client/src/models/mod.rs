//! Request and response types exchanged with the HVCA API.
//!
//! These are plain serde mappings of the wire format. Timestamps on the wire
//! are Unix seconds.

pub mod certificate;
pub mod claim;
pub mod policy;
pub mod query;

pub use certificate::{
    CertInfo, CertMeta, CertStatus, CertificateRequest, DistinguishedName, OidAndValue,
    RevocationReason, RevocationRequest, SubjectAltNames, Validity,
};
pub use claim::{
    AuthorisedEmails, Claim, ClaimAssertionInfo, ClaimLogEntry, ClaimLogStatus, ClaimStatus,
    DnsEmails, HttpScheme,
};
pub use policy::{Policy, ValidityPolicy};
pub use query::{Pagination, TimeWindow};

use chrono::{DateTime, Utc};

pub(crate) fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}
