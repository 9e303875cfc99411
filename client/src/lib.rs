//! Typed client for the GlobalSign Atlas HVCA certificate issuance API.
//!
//! Every call goes through the [`Executor`], which keeps one bearer-token
//! session per client:
//!
//! - the token is renewed before use once it is older than the configured
//!   lifetime, with at most one login in flight;
//! - a 401 on an authenticated call forces one login and one more attempt;
//! - 503 and 202 responses are retried with linear backoff, five times by
//!   default;
//! - every response body is read to the end before the call returns.
//!
//! Every operation takes a [`CallContext`] carrying cancellation and an
//! optional deadline.
//!
//! The client only emits `tracing` events. Applications without a
//! subscriber of their own can install one with [`init_tracing`]; the
//! default filter logs logins and retries from this crate at `debug`.
//!
//! ```no_run
//! use hvca_client::{CallContext, HvcaClient, HvcaConfig};
//!
//! # async fn run() -> hvca_client::HvcaResult<()> {
//! hvca_client::init_tracing(&hvca_client::TracingConfig::default());
//! let config = HvcaConfig::from_file("hvca.json")?;
//! let ctx = CallContext::new();
//! let client = HvcaClient::connect(&ctx, &config).await?;
//! let chain = client.trust_chain(&ctx).await?;
//! println!("{} certificates in chain", chain.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod executor;
pub mod models;
pub mod operation;
pub mod session;

pub use auth::{AuthState, Authenticator, Credentials, DEFAULT_TOKEN_LIFETIME, TokenIssuer};
pub use client::HvcaClient;
pub use config::{DEFAULT_TIMEOUT, HvcaConfig};
pub use decode::Page;
pub use error::{ApiError, HvcaError, HvcaResult};
pub use executor::Executor;
pub use hvca_common::{CallContext, RetryConfig, TlsConfig, TracingConfig, init_tracing};
pub use models::*;
pub use operation::{Operation, OperationKind, Reply};
pub use session::TokenStore;
