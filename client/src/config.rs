//! HVCA client configuration.
//!
//! Built programmatically with the `with_*` methods or loaded from a JSON
//! file with [`HvcaConfig::from_file`].

use crate::{
    auth::{Credentials, DEFAULT_TOKEN_LIFETIME},
    error::{HvcaError, HvcaResult},
};
use hvca_common::{HttpConfig, RetryConfig, TlsConfig};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HVCA client configuration.
#[derive(Debug, Clone)]
pub struct HvcaConfig {
    /// Base URL of the API, e.g. `https://emea.api.hvca.globalsign.com:8443/v2`
    pub url: String,
    /// API key and secret
    pub credentials: Credentials,
    /// mTLS identity, extra roots, verification toggle
    pub tls: TlsConfig,
    /// Headers sent with every request
    pub extra_headers: Vec<(String, String)>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry budget for 503/202 responses
    pub retry: RetryConfig,
    /// Assumed bearer token lifetime
    pub token_lifetime: Duration,
}

/// On-disk JSON format.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    url: String,
    api_key: String,
    api_secret: String,
    #[serde(default)]
    cert_file: Option<PathBuf>,
    #[serde(default)]
    key_file: Option<PathBuf>,
    #[serde(default)]
    key_passphrase: Option<String>,
    #[serde(default)]
    root_ca_file: Option<PathBuf>,
    #[serde(default)]
    extra_headers: BTreeMap<String, String>,
    #[serde(default)]
    insecure_skip_verify: bool,
    /// Seconds
    #[serde(default)]
    timeout: Option<u64>,
}

impl HvcaConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::new(api_key, api_secret),
            tls: TlsConfig::default(),
            extra_headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }

    /// Load and validate a JSON configuration file.
    ///
    /// Relative certificate and key paths are resolved against the directory
    /// containing the file.
    ///
    /// # Errors
    ///
    /// Returns [`HvcaError::Io`] if a file cannot be read,
    /// [`HvcaError::InvalidConfig`] if the JSON is malformed or fails
    /// validation.
    pub fn from_file(path: impl AsRef<Path>) -> HvcaResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path)?;
        let file: ConfigFile = serde_json::from_slice(&raw)
            .map_err(|e| HvcaError::invalid_config(format!("{}: {e}", path.display())))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        if file.key_passphrase.as_deref().is_some_and(|p| !p.is_empty()) {
            return Err(HvcaError::invalid_config(
                "encrypted private keys are not supported",
            ));
        }

        let identity_pem = match (&file.cert_file, &file.key_file) {
            (Some(cert), Some(key)) => {
                let mut pem = std::fs::read(base.join(cert))?;
                pem.push(b'\n');
                pem.extend(std::fs::read(base.join(key))?);
                Some(pem)
            }
            (None, None) => None,
            _ => {
                return Err(HvcaError::invalid_config(
                    "cert_file and key_file must be given together",
                ));
            }
        };

        let root_ca_pem = file
            .root_ca_file
            .as_ref()
            .map(|p| std::fs::read(base.join(p)))
            .transpose()?;

        let mut config = Self::new(file.url, file.api_key, file.api_secret)
            .with_tls(TlsConfig {
                identity_pem,
                root_ca_pem,
                insecure_skip_verify: file.insecure_skip_verify,
            });
        config.extra_headers = file.extra_headers.into_iter().collect();
        if let Some(secs) = file.timeout {
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set TLS settings.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Set retry budget.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set assumed token lifetime.
    #[must_use]
    pub const fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`HvcaError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> HvcaResult<()> {
        let url = Url::parse(&self.url)
            .map_err(|e| HvcaError::invalid_config(format!("url {:?}: {e}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HvcaError::invalid_config(format!(
                "url scheme must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.credentials.api_key.is_empty() {
            return Err(HvcaError::invalid_config("api_key is empty"));
        }
        if secrecy::ExposeSecret::expose_secret(&self.credentials.api_secret).is_empty() {
            return Err(HvcaError::invalid_config("api_secret is empty"));
        }
        if self.timeout.is_zero() {
            return Err(HvcaError::invalid_config("timeout must be positive"));
        }
        if self.token_lifetime.is_zero() {
            return Err(HvcaError::invalid_config("token lifetime must be positive"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// HTTP client settings derived from this configuration.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        self.extra_headers.iter().fold(
            HttpConfig::default()
                .with_timeout(self.timeout)
                .with_tls(self.tls.clone()),
            |http, (name, value)| http.with_header(name.as_str(), value.as_str()),
        )
    }
}
