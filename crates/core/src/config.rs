//! Client configuration.
//!
//! [`Config`] is the immutable value the dispatcher reads on every request.
//! [`ConfigFile`] is its TOML form, with `${ENV_VAR}` references expanded
//! before parsing so keys can stay out of the file.

use crate::{Result, TokenProvider, build_url};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, sync::Arc, time::Duration};
use url::Url;

/// Default API host.
pub const DEFAULT_HOST: &str = "api.openai.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection and auth settings shared by every request of a client.
#[derive(Clone)]
pub struct Config {
    token: Arc<dyn TokenProvider>,

    /// Sent as `OpenAI-Organization` when set.
    pub organization: Option<String>,

    /// URL scheme, `https` unless pointed at a local server.
    pub scheme: String,

    /// API host.
    pub host: String,

    /// API port.
    pub port: u16,

    /// Path prefix prepended to every endpoint path.
    pub base_path: String,

    /// Deadline for a single-shot request, from sending it to the last byte
    /// of the reply.
    ///
    /// Streaming sessions use it as an idle limit instead: the stream fails
    /// only when no bytes arrive for this long, however long it runs.
    pub timeout: Duration,
}

impl Config {
    /// Create a configuration for the default host with the given token
    /// source.
    pub fn new(token: impl TokenProvider + 'static) -> Self {
        Self {
            token: Arc::new(token),
            organization: None,
            scheme: "https".into(),
            host: DEFAULT_HOST.into(),
            port: 443,
            base_path: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the organization identifier.
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the scheme.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the base path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ask the token provider for the current token.
    pub fn token(&self) -> String {
        self.token.token()
    }

    /// Absolute URL of an endpoint path on the configured server.
    pub fn url(&self, path: &str) -> Result<Url> {
        build_url(&self.scheme, &self.host, self.port, &self.base_path, path)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("organization", &self.organization)
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_path", &self.base_path)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// TOML representation of [`Config`].
///
/// ```toml
/// api_key = "${OPENAI_API_KEY}"
/// organization = "org-123"
/// host = "api.openai.com"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// API key, usually an `${ENV_VAR}` reference.
    pub api_key: String,

    /// Optional organization identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// URL scheme.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// API host.
    #[serde(default = "default_host")]
    pub host: String,

    /// API port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix for every endpoint.
    #[serde(default)]
    pub base_path: String,

    /// Request timeout in seconds; the idle limit for streams.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ConfigFile {
    /// Parse a TOML string, expanding `${ENV_VAR}` references first.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let expanded = expand_env_vars(toml_str)?;
        let config: Self = toml::from_str(&expanded).context("invalid client configuration")?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Turn the file form into a runtime configuration.
    pub fn into_config(self) -> Config {
        let mut config = Config::new(self.api_key)
            .scheme(self.scheme)
            .host(self.host)
            .port(self.port)
            .base_path(self.base_path)
            .timeout(Duration::from_secs(self.timeout_secs));
        config.organization = self.organization;
        config
    }
}

/// Replace `${NAME}` with the value of the environment variable `NAME`.
///
/// A reference to an unset variable, or a `${` that is never closed, is an
/// error naming the variable, so a missing key is caught at load time rather
/// than sent as an empty bearer token. A `$` not followed by `{` is kept.
pub fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut expanded = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let reference = &rest[start + 2..];
        let end = reference
            .find('}')
            .with_context(|| format!("unterminated ${{ in `${{{reference}`"))?;
        let name = &reference[..end];
        let value = std::env::var(name)
            .with_context(|| format!("environment variable {name} is not set"))?;
        expanded.push_str(&value);
        rest = &reference[end + 1..];
    }
    expanded.push_str(rest);
    Ok(expanded)
}

fn default_scheme() -> String {
    "https".into()
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}

fn default_port() -> u16 {
    443
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
