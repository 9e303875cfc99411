//! Bearer token storage shared by all calls made through one client.

use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug)]
struct Session {
    token: SecretString,
    last_login_at: Option<Instant>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token: SecretString::from(String::new()),
            last_login_at: None,
        }
    }
}

/// Current bearer token and the time of the last successful login.
///
/// Both fields always change together under the write lock, so a reader never
/// sees a token paired with a stale timestamp.
#[derive(Debug, Default)]
pub struct TokenStore {
    session: RwLock<Session>,
}

impl TokenStore {
    /// Create an empty, logged-out store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token; empty when logged out.
    pub async fn read(&self) -> SecretString {
        self.session.read().await.token.clone()
    }

    /// Store a freshly issued token and stamp the login time.
    pub async fn set(&self, token: SecretString) {
        let mut session = self.session.write().await;
        session.token = token;
        session.last_login_at = Some(Instant::now());
    }

    /// Forget the token and the login time.
    pub async fn reset(&self) {
        *self.session.write().await = Session::default();
    }

    /// True when more than `lifetime` has passed since the last login, or
    /// when there has been no successful login.
    pub async fn has_expired(&self, lifetime: Duration) -> bool {
        self.session
            .read()
            .await
            .last_login_at
            .is_none_or(|at| at.elapsed() > lifetime)
    }

    /// True when a non-empty token is held.
    pub async fn is_logged_in(&self) -> bool {
        !self.session.read().await.token.expose_secret().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_store_is_expired() {
        let store = TokenStore::new();
        assert!(store.has_expired(Duration::from_secs(600)).await);
        assert!(!store.is_logged_in().await);
        assert_eq!(store.read().await.expose_secret(), "");
    }

    #[tokio::test]
    async fn test_set_stamps_login_time() {
        let store = TokenStore::new();
        store.set(SecretString::from("abc")).await;

        assert_eq!(store.read().await.expose_secret(), "abc");
        assert!(!store.has_expired(Duration::from_secs(600)).await);
        assert!(store.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_token_expires_after_lifetime() {
        let store = TokenStore::new();
        store.set(SecretString::from("abc")).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(store.has_expired(Duration::from_millis(5)).await);
    }

    #[tokio::test]
    async fn test_reset_clears_both_fields() {
        let store = TokenStore::new();
        store.set(SecretString::from("abc")).await;
        store.reset().await;

        assert_eq!(store.read().await.expose_secret(), "");
        assert!(store.has_expired(Duration::from_secs(600)).await);
    }

    #[tokio::test]
    async fn test_debug_does_not_leak_token() {
        let store = TokenStore::new();
        store.set(SecretString::from("super-secret-token")).await;

        let debug = format!("{store:?}");
        assert!(!debug.contains("super-secret-token"));
    }
}
