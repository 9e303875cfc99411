//! Shared library for cross-cutting concerns in the HVCA client crates.
//!
//! This crate provides centralized implementations for:
//! - Transport and context error types
//! - HTTP client configuration and building (pooling, mTLS, custom roots)
//! - Linear retry budgets
//! - Cancellable call contexts with deadlines
//! - Tracing subscriber initialisation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod http;
pub mod retry;
pub mod tracing_config;

pub use context::CallContext;
pub use error::PlatformError;
pub use http::{HttpConfig, TlsConfig, build_http_client};
pub use retry::{RetryBudget, RetryConfig};
pub use tracing_config::{TracingConfig, init_tracing};
