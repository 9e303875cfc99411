//! Fake HVCA server built on wiremock.
//!
//! [`MockHvca`] owns a [`MockServer`] and mounts the login endpoint with a
//! [`TokenMinter`], so tests can count logins and tell tokens apart.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/login";

/// API key used by fixtures and harness configurations.
pub const TEST_API_KEY: &str = "test-api-key";

/// API secret used by fixtures and harness configurations.
pub const TEST_API_SECRET: &str = "test-api-secret";

/// `application/problem+json` response carrying `description`.
#[must_use]
pub fn problem(status: u16, description: &str) -> ResponseTemplate {
    let body = serde_json::json!({ "description": description }).to_string();
    ResponseTemplate::new(status).set_body_raw(body, "application/problem+json")
}

/// Login responder returning `token-1`, `token-2`, ... on successive calls.
#[derive(Debug, Clone, Default)]
pub struct TokenMinter {
    issued: Arc<AtomicUsize>,
    delay: Duration,
}

impl TokenMinter {
    /// Create a minter that answers immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every login response, to widen race windows.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of tokens handed out so far.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Respond for TokenMinter {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({ "access_token": format!("token-{n}") }))
            .set_delay(self.delay)
    }
}

/// Responder that plays `responses` in order and then repeats the last one.
#[derive(Debug)]
pub struct Sequence {
    responses: Vec<ResponseTemplate>,
    served: AtomicUsize,
}

impl Sequence {
    /// Create a sequence. An empty sequence answers 500.
    #[must_use]
    pub fn new(responses: Vec<ResponseTemplate>) -> Self {
        Self {
            responses,
            served: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(n)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_else(|| ResponseTemplate::new(500))
    }
}

/// A fake HVCA endpoint.
pub struct MockHvca {
    server: MockServer,
    minter: TokenMinter,
}

impl MockHvca {
    /// Start a server with a working login endpoint.
    pub async fn start() -> Self {
        Self::start_with_minter(TokenMinter::new()).await
    }

    /// Start a server whose login endpoint uses `minter`.
    pub async fn start_with_minter(minter: TokenMinter) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(minter.clone())
            .mount(&server)
            .await;
        Self { server, minter }
    }

    /// Start a server without a login endpoint, for tests that mount their own.
    pub async fn start_bare() -> Self {
        Self {
            server: MockServer::start().await,
            minter: TokenMinter::new(),
        }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// The underlying wiremock server, for mounting endpoint mocks.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// Number of logins served by the harness minter.
    #[must_use]
    pub fn logins(&self) -> usize {
        self.minter.issued()
    }

    /// All requests received for `request_path`, in arrival order.
    pub async fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }

    /// Total number of requests received.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

