//! The ConfigHub client: pulls snapshots and serves reads against them.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::StatusCode;

use crate::config::ClientOptions;
use crate::error::{ClientError, RequestError};
use crate::http::{
    identity_headers, HttpClient, FILE_HEADER, PULL_ENDPOINT, RAW_FILE_ENDPOINT,
};
use crate::snapshot::{Lookup, Snapshot};
use crate::transport::build_client;
use crate::value::ConfigValue;

/// Client for a ConfigHub server.
///
/// Holds at most one [`Snapshot`], installed by [`ConfigClient::pull`] and
/// replaced wholesale by the next successful pull. Replacement is an atomic
/// pointer swap, so readers see either the previous or the new snapshot.
#[derive(Debug)]
pub struct ConfigClient {
    http: HttpClient,
    snapshot: ArcSwapOption<Snapshot>,
}

impl ConfigClient {
    /// Creates a client for `server_url`, authenticating with `token` and
    /// resolving configuration for `context`.
    pub fn new(
        server_url: impl Into<String>,
        token: impl AsRef<str>,
        context: impl AsRef<str>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = build_client(options.resolved_environment(), &options.transport)?;
        let headers = identity_headers(token.as_ref(), context.as_ref(), options.headers);
        let http = HttpClient::new(client, server_url, headers)?;
        Ok(Self {
            http,
            snapshot: ArcSwapOption::empty(),
        })
    }

    /// Formatted headers sent with every request.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        self.http.headers()
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Retrieves the configuration document and installs it as the current snapshot.
    ///
    /// Only HTTP 200 is accepted. On any failure the previously installed
    /// snapshot (if any) is left untouched.
    pub async fn pull(&self) -> Result<Arc<Snapshot>, ClientError> {
        let response = self.http.get(PULL_ENDPOINT, &[]).await?;
        if response.status != StatusCode::OK {
            return Err(RequestError::new(
                "Could not pull config",
                response.status,
                response.error_detail(),
            )
            .into());
        }

        let snapshot = Arc::new(Snapshot::from_slice(&response.body)?);
        tracing::debug!(
            properties = snapshot.properties.len(),
            files = snapshot.files.len(),
            generated_on = snapshot.generated_on().unwrap_or("unknown"),
            "installed config-hub snapshot"
        );
        self.snapshot.store(Some(Arc::clone(&snapshot)));
        Ok(snapshot)
    }

    /// Whether a pull has succeeded.
    pub fn is_pulled(&self) -> bool {
        self.snapshot.load().is_some()
    }

    /// Returns the currently installed snapshot.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, ClientError> {
        self.snapshot.load_full().ok_or(ClientError::ConfigNotPulled)
    }

    /// Reads and decodes a property.
    ///
    /// Returns `None` both for unknown keys and for keys provisioned without a
    /// value; use [`ConfigClient::fetch_or_else`] to tell them apart.
    pub fn fetch(&self, key: impl Display) -> Result<Option<ConfigValue>, ClientError> {
        self.fetch_or_else(key, || None::<ConfigValue>)
    }

    /// Reads and decodes a property, falling back to `default` for unknown keys.
    ///
    /// `default` runs only when the key was never provisioned. A key that is
    /// present without a value yields `None` and never triggers the fallback.
    pub fn fetch_or_else<F, T>(
        &self,
        key: impl Display,
        default: F,
    ) -> Result<Option<ConfigValue>, ClientError>
    where
        F: FnOnce() -> T,
        T: Into<Option<ConfigValue>>,
    {
        let snapshot = self.snapshot()?;
        match snapshot.lookup(&key.to_string()) {
            Lookup::Missing => Ok(default().into()),
            Lookup::Empty => Ok(None),
            Lookup::Present(property) => Ok(property.decode()?),
        }
    }

    /// Whether `key` is provisioned, with or without a value.
    pub fn has(&self, key: impl Display) -> Result<bool, ClientError> {
        Ok(self.snapshot()?.contains(&key.to_string()))
    }

    /// Raw, undecoded value of every property.
    pub fn to_map(&self) -> Result<HashMap<String, Option<String>>, ClientError> {
        Ok(self.snapshot()?.raw_values())
    }

    /// Returns the content of a file.
    ///
    /// Files embedded in the current snapshot are served from memory. Anything
    /// else is requested from `/rest/rawFile`: 200 yields the body, 204 yields
    /// `None`, and any other status is an error.
    pub async fn fetch_file(&self, key: impl Display) -> Result<Option<String>, ClientError> {
        let key = key.to_string();
        if let Some(snapshot) = self.snapshot.load_full() {
            if let Some(content) = snapshot.file_content(&key) {
                tracing::trace!(file = %key, "serving file from config-hub snapshot");
                return Ok(Some(content.to_string()));
            }
        }

        let response = self
            .http
            .get(RAW_FILE_ENDPOINT, &[(FILE_HEADER, key.as_str())])
            .await?;
        match response.status {
            StatusCode::OK => Ok(Some(String::from_utf8_lossy(&response.body).into_owned())),
            StatusCode::NO_CONTENT => Ok(None),
            status => Err(RequestError::new(
                "Could not fetch file",
                status,
                response.error_detail(),
            )
            .into()),
        }
    }
}
