//! Client options and environment-driven helpers.
//!
//! [`ClientOptions`] is what [`crate::ConfigClient::new`] consumes.
//! [`ClientEnv`] derives the constructor arguments from the process
//! environment for hosts that prefer to configure the client that way.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::client::ConfigClient;
use crate::error::ClientError;
use crate::transport::{TransportOptions, DEFAULT_ENVIRONMENT};

/// Base URL of the ConfigHub server.
const ENV_SERVER_URL: &str = "CONFIG_HUB_SERVER_URL";
/// Client token used to authenticate requests.
const ENV_TOKEN: &str = "CONFIG_HUB_TOKEN";
/// Context string selecting which configuration to resolve.
const ENV_CONTEXT: &str = "CONFIG_HUB_CONTEXT";
/// Deployment environment name; drives the TLS verification default.
const ENV_ENVIRONMENT: &str = "CONFIG_HUB_ENVIRONMENT";
/// Generic application environment consulted when no dedicated one is set.
const ENV_APP_ENV: &str = "APP_ENV";
/// Explicit override for TLS certificate validation.
const ENV_VERIFY_TLS: &str = "CONFIG_HUB_VERIFY_TLS";
/// Total request timeout in seconds.
const ENV_TIMEOUT_SECS: &str = "CONFIG_HUB_TIMEOUT_SECS";
/// Prefix for variables turned into extra request headers.
const ENV_HEADER_PREFIX: &str = "CONFIG_HUB_HEADER_";

/// Options accepted by [`ConfigClient::new`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Deployment environment; TLS is verified only for `production`.
    /// Defaults to `development` when unset.
    pub environment: Option<String>,
    /// Extra headers sent with every request. Names are formatted like the
    /// identity headers (`some_other_header` becomes `Some-Other-Header`).
    pub headers: Vec<(String, String)>,
    /// Options handed to the HTTP transport as-is.
    pub transport: TransportOptions,
}

impl ClientOptions {
    /// Environment name after applying the default.
    pub fn resolved_environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Environment-derived client settings.
#[derive(Debug, Clone, Default)]
pub struct ClientEnv {
    pub server_url: Option<String>,
    pub token: Option<String>,
    pub context: Option<String>,
    pub environment: Option<String>,
    pub verify_tls: Option<bool>,
    pub timeout: Option<Duration>,
    /// Extra headers, sorted by name for deterministic ordering.
    pub headers: Vec<(String, String)>,
}

impl ClientEnv {
    /// Builds settings from the current process environment.
    pub fn from_os_env() -> Self {
        Self::from_env_iter(env::vars())
    }

    /// Builds settings from an iterator of key/value pairs (typically for tests).
    pub fn from_env_iter<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |name: &str| map.get(name).and_then(|value| sanitize_non_empty(value));

        let environment = get(ENV_ENVIRONMENT).or_else(|| get(ENV_APP_ENV));
        let verify_tls = map
            .get(ENV_VERIFY_TLS)
            .and_then(|value| parse_bool(value));
        let timeout = get(ENV_TIMEOUT_SECS)
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs);

        let mut headers: Vec<(String, String)> = map
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(ENV_HEADER_PREFIX)?;
                let value = sanitize_non_empty(value)?;
                (!name.is_empty()).then(|| (name.to_ascii_lowercase(), value))
            })
            .collect();
        headers.sort();

        Self {
            server_url: get(ENV_SERVER_URL),
            token: get(ENV_TOKEN),
            context: get(ENV_CONTEXT),
            environment,
            verify_tls,
            timeout,
            headers,
        }
    }

    /// Client options carried by the environment.
    pub fn options(&self) -> ClientOptions {
        ClientOptions {
            environment: self.environment.clone(),
            headers: self.headers.clone(),
            transport: TransportOptions {
                verify_tls: self.verify_tls,
                timeout: self.timeout,
                ..TransportOptions::default()
            },
        }
    }

    /// Builds a client when the URL, token, and context are all present.
    pub fn into_client(self) -> Option<Result<ConfigClient, ClientError>> {
        let options = self.options();
        let (server_url, token, context) = (self.server_url?, self.token?, self.context?);
        Some(ConfigClient::new(server_url, token, context, options))
    }
}

/// Helper trimming whitespace and discarding empty values.
fn sanitize_non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses common boolean spellings; anything else counts as unset.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}
