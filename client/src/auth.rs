//! Login handshake and token refresh coordination.
//!
//! The token store and the login decision are guarded by two different
//! primitives: readers of a valid token never wait behind a login in flight,
//! and concurrent callers that all find the token expired produce a single
//! login between them.

use crate::{error::HvcaResult, session::TokenStore};
use async_trait::async_trait;
use hvca_common::CallContext;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Token lifetime assumed by the client. HVCA tokens live longer; refreshing
/// early leaves room for clock skew and avoids a doomed first attempt.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(10 * 60);

/// API key and secret used for the login handshake.
#[derive(Clone)]
pub struct Credentials {
    /// API key
    pub api_key: String,
    /// API secret
    pub api_secret: SecretString,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Wire body for `POST /login`.
    #[must_use]
    pub fn login_request(&self) -> LoginRequest<'_> {
        LoginRequest {
            api_key: &self.api_key,
            api_secret: self.api_secret.expose_secret(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// `POST /login` request body.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    api_key: &'a str,
    api_secret: &'a str,
}

/// `POST /login` response body.
#[derive(Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    pub access_token: String,
}

/// Performs the login call itself.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn issue_token(
        &self,
        ctx: &CallContext,
        credentials: &Credentials,
    ) -> HvcaResult<SecretString>;
}

/// Session state as seen by the authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No token held
    LoggedOut,
    /// A login call is in flight
    LoggingIn,
    /// A token is held
    LoggedIn,
}

/// Coordinates logins for one client instance.
#[derive(Debug)]
pub struct Authenticator {
    credentials: Credentials,
    store: TokenStore,
    login_lock: Mutex<()>,
    lifetime: Duration,
    in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Authenticator {
    /// Create a logged-out authenticator.
    #[must_use]
    pub fn new(credentials: Credentials, lifetime: Duration) -> Self {
        Self {
            credentials,
            store: TokenStore::new(),
            login_lock: Mutex::new(()),
            lifetime,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// The token store backing this session.
    #[must_use]
    pub const fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Assumed token lifetime.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Current session state.
    pub async fn state(&self) -> AuthState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            AuthState::LoggingIn
        } else if self.store.is_logged_in().await {
            AuthState::LoggedIn
        } else {
            AuthState::LoggedOut
        }
    }

    /// Log in unconditionally.
    ///
    /// Stores the new token on success and clears the session on failure.
    /// Concurrent calls are not serialized; use [`Self::login_if_expired`]
    /// for at-most-one-login semantics.
    ///
    /// # Errors
    ///
    /// Returns whatever the issuer returned.
    #[instrument(skip_all, fields(api_key = %self.credentials.api_key))]
    pub async fn login(&self, issuer: &dyn TokenIssuer, ctx: &CallContext) -> HvcaResult<()> {
        let result = {
            let _in_flight = InFlight::enter(&self.in_flight);
            issuer.issue_token(ctx, &self.credentials).await
        };

        match result {
            Ok(token) => {
                self.store.set(token).await;
                info!("Logged in to HVCA");
                Ok(())
            }
            Err(e) => {
                self.store.reset().await;
                warn!(error = %e, "HVCA login failed");
                Err(e)
            }
        }
    }

    /// Log in only if the held token is considered expired.
    ///
    /// # Errors
    ///
    /// Returns a context error if the context ends while waiting for another
    /// caller's login, or the login error.
    pub async fn login_if_expired(
        &self,
        issuer: &dyn TokenIssuer,
        ctx: &CallContext,
    ) -> HvcaResult<()> {
        if !self.store.has_expired(self.lifetime).await {
            return Ok(());
        }

        let _guard = ctx.run(self.login_lock.lock()).await?;

        // Another caller may have logged in while we waited for the lock.
        if !self.store.has_expired(self.lifetime).await {
            debug!("Token refreshed by a concurrent caller");
            return Ok(());
        }

        self.login(issuer, ctx).await
    }

    /// Current token for the `Authorization` header.
    pub async fn token(&self) -> SecretString {
        self.store.read().await
    }
}
