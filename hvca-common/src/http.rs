//! Centralized HTTP client configuration and building.
//!
//! The HVCA client shares one pooled `reqwest::Client` across every
//! concurrent call, so the defaults here favour connection reuse.

use crate::PlatformError;
use reqwest::{
    Certificate, Client, ClientBuilder, Identity,
    header::{HeaderMap, HeaderName, HeaderValue},
    redirect,
};
use std::time::Duration;

/// TLS settings for the HTTP client.
#[derive(Clone, Default)]
pub struct TlsConfig {
    /// PEM-encoded client certificate followed by its PEM-encoded private key
    pub identity_pem: Option<Vec<u8>>,
    /// PEM bundle of extra root certificates to trust
    pub root_ca_pem: Option<Vec<u8>>,
    /// Skip server certificate verification (testing only)
    pub insecure_skip_verify: bool,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("identity_pem", &self.identity_pem.as_ref().map(|_| "[REDACTED]"))
            .field("root_ca_pem", &self.root_ca_pem.as_ref().map(Vec::len))
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host (default: 1024)
    pub pool_max_idle_per_host: usize,
    /// User agent string
    pub user_agent: String,
    /// Headers attached to every request
    pub default_headers: Vec<(String, String)>,
    /// TLS settings
    pub tls: TlsConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 1024,
            user_agent: concat!("hvca-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers: Vec::new(),
            tls: TlsConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with custom timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Create a new HTTP config with custom TLS settings.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    fn header_map(&self) -> Result<HeaderMap, PlatformError> {
        let mut headers = HeaderMap::with_capacity(self.default_headers.len());
        for (name, value) in &self.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| PlatformError::invalid_input(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| PlatformError::invalid_input(format!("header {name}: {e}")))?;
            headers.append(name, value);
        }
        Ok(headers)
    }
}

/// Build a configured HTTP client.
///
/// Creates a reqwest client with rustls TLS, connection pooling, the
/// configured TLS material and redirects disabled. The HVCA API never
/// redirects, so a 3xx reaches the caller as an ordinary non-2xx status.
///
/// # Errors
///
/// Returns an error if a default header is malformed, the TLS material
/// cannot be parsed, or the client cannot be built.
///
/// # Examples
///
/// ```
/// use hvca_common::{HttpConfig, build_http_client};
/// use std::time::Duration;
///
/// let config = HttpConfig::default()
///     .with_timeout(Duration::from_secs(60));
/// let client = build_http_client(&config).expect("Failed to build client");
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, PlatformError> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(&config.user_agent)
        .default_headers(config.header_map()?)
        .redirect(redirect::Policy::none())
        .use_rustls_tls();

    if let Some(pem) = &config.tls.identity_pem {
        let identity = Identity::from_pem(pem)
            .map_err(|e| PlatformError::invalid_tls(format!("client identity: {e}")))?;
        builder = builder.identity(identity);
    }

    if let Some(pem) = &config.tls.root_ca_pem {
        let roots = Certificate::from_pem_bundle(pem)
            .map_err(|e| PlatformError::invalid_tls(format!("root CA bundle: {e}")))?;
        if roots.is_empty() {
            return Err(PlatformError::invalid_tls("root CA bundle contains no certificates"));
        }
        for root in roots {
            builder = builder.add_root_certificate(root);
        }
    }

    if config.tls.insecure_skip_verify {
        tracing::warn!("server certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(PlatformError::Http)
}
