//! Shared test utilities for the HVCA client crates.
//!
//! This crate provides:
//! - A wiremock-backed fake HVCA server with a counting login endpoint
//! - Proptest generators for serials, claim ids, statuses and headers
//! - JSON fixtures shaped like real HVCA responses

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::{
    LOGIN_PATH, MockHvca, Sequence, TEST_API_KEY, TEST_API_SECRET, TokenMinter, problem,
};
