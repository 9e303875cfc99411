//! Request executor: sends one logical operation to completion.
//!
//! Each attempt attaches a fresh token, sends the request, reads the whole
//! body and classifies the status:
//!
//! | status                      | outcome                                   |
//! |-----------------------------|-------------------------------------------|
//! | 2xx other than 202          | success                                   |
//! | 401 on a non-login call     | forced login, then one more attempt       |
//! | 503, or 202 (not ready yet) | linear backoff while the budget lasts     |
//! | anything else               | fatal [`ApiError`](crate::ApiError)       |
//!
//! Transport failures, context errors and encode/decode errors are never
//! retried. The forced login after a 401 does not consume the retry budget.

use crate::{
    auth::{Authenticator, Credentials, LoginResponse, TokenIssuer},
    config::HvcaConfig,
    decode::{self, JSON_CONTENT_TYPE},
    error::HvcaResult,
    operation::{Operation, OperationKind, Reply},
};
use async_trait::async_trait;
use hvca_common::{CallContext, RetryConfig, build_http_client};
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Relogin,
    Retry,
    Fail,
}

fn classify(status: StatusCode, kind: OperationKind, relogged: bool) -> Outcome {
    match status {
        StatusCode::ACCEPTED | StatusCode::SERVICE_UNAVAILABLE => Outcome::Retry,
        StatusCode::UNAUTHORIZED if kind == OperationKind::Authenticated && !relogged => {
            Outcome::Relogin
        }
        s if s.is_success() => Outcome::Success,
        _ => Outcome::Fail,
    }
}

/// Executes [`Operation`]s against one HVCA endpoint with one session.
#[derive(Debug)]
pub struct Executor {
    http: Client,
    base_url: String,
    retry: RetryConfig,
    auth: Authenticator,
}

impl Executor {
    /// Build the HTTP pool and a logged-out session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &HvcaConfig) -> HvcaResult<Self> {
        config.validate()?;
        let http = build_http_client(&config.http_config())?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            retry: config.retry,
            auth: Authenticator::new(config.credentials.clone(), config.token_lifetime),
        })
    }

    /// The session's authenticator.
    #[must_use]
    pub const fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Retry settings applied to every operation.
    #[must_use]
    pub const fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    /// Log in unconditionally.
    ///
    /// # Errors
    ///
    /// Returns the login error; the session is cleared in that case.
    pub async fn login(&self, ctx: &CallContext) -> HvcaResult<()> {
        self.auth.login(self, ctx).await
    }

    /// Execute `op` and return the raw, fully read reply.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error, or the API error of the last attempt
    /// once the retry budget is spent.
    #[instrument(skip_all, fields(method = %op.method(), path = %op.path()))]
    pub async fn execute(&self, ctx: &CallContext, op: &Operation) -> HvcaResult<Reply> {
        op.validate()?;
        ctx.check()?;

        let mut budget = self.retry.budget();
        let mut relogged = false;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let reply = self.attempt(ctx, op).await?;
            let status = reply.status.as_u16();

            match classify(reply.status, op.kind(), relogged) {
                Outcome::Success => {
                    debug!(attempt, status, "Request succeeded");
                    return Ok(reply);
                }
                Outcome::Relogin => {
                    warn!(attempt, "Token rejected, logging in again");
                    relogged = true;
                    self.auth.login(self, ctx).await?;
                }
                Outcome::Retry => {
                    let Some(delay) = budget.next_delay() else {
                        warn!(attempt, status, "Retry budget exhausted");
                        return Err(decode::api_error(&reply).into());
                    };
                    debug!(
                        attempt,
                        status,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Service not ready, retrying"
                    );
                    ctx.sleep(delay).await?;
                }
                Outcome::Fail => {
                    let err = decode::api_error(&reply);
                    debug!(attempt, status, description = %err.description, "Request failed");
                    return Err(err.into());
                }
            }
        }
    }

    /// Execute `op` and decode its JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`] and [`decode::json`].
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        op: &Operation,
    ) -> HvcaResult<T> {
        let reply = self.execute(ctx, op).await?;
        decode::json(&reply)
    }

    async fn attempt(&self, ctx: &CallContext, op: &Operation) -> HvcaResult<Reply> {
        let url = format!("{}{}", self.base_url, op.path());
        let mut request = self.http.request(op.method().clone(), url);

        if !op.query().is_empty() {
            request = request.query(op.query());
        }
        if let Some(body) = op.body() {
            request = request
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body.to_vec());
        }
        if !op.is_login() {
            self.auth.login_if_expired(self, ctx).await?;
            let token = self.auth.token().await;
            request = request.bearer_auth(token.expose_secret());
        }

        let response = ctx.run(request.send()).await??;
        let status = response.status();
        let headers = response.headers().clone();
        // Always read to the end so the connection goes back to the pool.
        let body = ctx.run(response.bytes()).await??;

        Ok(Reply {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl TokenIssuer for Executor {
    async fn issue_token(
        &self,
        ctx: &CallContext,
        credentials: &Credentials,
    ) -> HvcaResult<SecretString> {
        let op = Operation::login(&credentials.login_request())?;
        let login: LoginResponse = self.execute_json(ctx, &op).await?;
        Ok(SecretString::from(login.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success() {
        for code in [200, 201, 204] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(
                classify(status, OperationKind::Authenticated, false),
                Outcome::Success
            );
        }
    }

    #[test]
    fn test_classify_accepted_is_retry() {
        assert_eq!(
            classify(StatusCode::ACCEPTED, OperationKind::Authenticated, false),
            Outcome::Retry
        );
        assert_eq!(
            classify(StatusCode::SERVICE_UNAVAILABLE, OperationKind::Login, false),
            Outcome::Retry
        );
    }

    #[test]
    fn test_classify_unauthorized() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, OperationKind::Authenticated, false),
            Outcome::Relogin
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, OperationKind::Authenticated, true),
            Outcome::Fail
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, OperationKind::Login, false),
            Outcome::Fail
        );
    }

    #[test]
    fn test_classify_other_failures() {
        for status in [
            StatusCode::MOVED_PERMANENTLY,
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::UNPROCESSABLE_ENTITY,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            assert_eq!(
                classify(status, OperationKind::Authenticated, false),
                Outcome::Fail
            );
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = HvcaConfig::new("not a url", "key", "secret");
        assert!(Executor::new(&config).is_err());
    }
}
