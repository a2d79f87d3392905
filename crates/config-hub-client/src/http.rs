//! HTTP plumbing for the ConfigHub REST API.
//!
//! Builds the identity headers sent with every request, issues GET requests
//! against the configured base URL, and buffers responses so callers can
//! classify the status themselves. Request and response details are logged at
//! debug level with credentials redacted.

use std::borrow::Cow;
use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};

use crate::error::ClientError;

/// Endpoint returning the full configuration document.
pub const PULL_ENDPOINT: &str = "/rest/pull";
/// Endpoint returning a single file body.
pub const RAW_FILE_ENDPOINT: &str = "/rest/rawFile";
/// Header naming the file requested from [`RAW_FILE_ENDPOINT`].
pub const FILE_HEADER: &str = "File";
/// Response header the server uses to carry the failure reason.
pub const ERROR_DETAIL_HEADER: &str = "etag";

/// Formats a header key as capitalised words joined by hyphens.
///
/// Words are split on `_`, `-`, whitespace, and lower-to-upper case
/// boundaries: `client_token` becomes `Client-Token`, `someOtherHeader`
/// becomes `Some-Other-Header`.
pub fn format_header_name(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;
    for c in key.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }
        let camel_boundary = c.is_uppercase()
            && previous.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
        if camel_boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        previous = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

/// Builds the formatted identity headers sent with every request.
///
/// Extra headers are applied after the identity pair, so an extra entry whose
/// formatted name collides with `Client-Token` or `Context` replaces it.
pub fn identity_headers<K, V>(
    token: &str,
    context: &str,
    extra: impl IntoIterator<Item = (K, V)>,
) -> BTreeMap<String, String>
where
    K: AsRef<str>,
    V: Into<String>,
{
    let mut headers = BTreeMap::new();
    headers.insert(format_header_name("client_token"), token.to_string());
    headers.insert(format_header_name("context"), context.to_string());
    for (key, value) in extra {
        headers.insert(format_header_name(key.as_ref()), value.into());
    }
    headers
}

/// Converts formatted headers into a reqwest header map.
fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ClientError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader(name.clone()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Value of the server's error-detail header, if present and printable.
    pub fn error_detail(&self) -> Option<String> {
        self.headers
            .get(ERROR_DETAIL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

/// Thin wrapper around a reusable `reqwest::Client`, base URL, and identity headers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Formatted identity headers, kept for introspection.
    formatted_headers: BTreeMap<String, String>,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        formatted_headers: BTreeMap<String, String>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let headers = to_header_map(&formatted_headers)?;
        Ok(Self {
            client,
            base_url,
            formatted_headers,
            headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Identity headers in their formatted (wire) spelling.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.formatted_headers
    }

    /// Issues a GET request carrying the identity headers plus `extra`.
    ///
    /// The response is returned whatever its status; classifying it is up to
    /// the caller since each endpoint accepts a different set of codes.
    pub async fn get(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<RawResponse, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut headers = self.headers.clone();
        for (name, value) in extra {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::InvalidHeader((*name).to_string()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ClientError::InvalidHeader((*name).to_string()))?;
            headers.insert(header_name, header_value);
        }

        tracing::debug!(
            method = %Method::GET,
            url = %url,
            headers = ?redact_headers(&headers),
            "config-hub HTTP request"
        );

        let response = self.client.get(&url).headers(headers).send().await?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            tracing::debug!(
                method = %Method::GET,
                url = %url,
                status = %status,
                content_length = body.len(),
                "config-hub HTTP response"
            );
        } else {
            // Error bodies are small and often explain the failure; keep a bounded preview.
            tracing::debug!(
                method = %Method::GET,
                url = %url,
                status = %status,
                content_length = body.len(),
                body = %truncate_preview_text(String::from_utf8_lossy(&body)),
                "config-hub HTTP response"
            );
        }

        Ok(RawResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

/// Returns a redacted view of request headers suitable for debug logging.
fn redact_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    const SENSITIVE_HEADERS: [&str; 2] = ["client-token", "authorization"];

    headers
        .iter()
        .map(|(name, value)| {
            let lower = name.as_str().to_ascii_lowercase();
            let display = if SENSITIVE_HEADERS.contains(&lower.as_str()) {
                "<redacted>".to_string()
            } else {
                value
                    .to_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| "<non-utf8>".to_string())
            };
            (lower, display)
        })
        .collect()
}

/// Caps a body preview at a fixed number of characters.
fn truncate_preview_text(text: Cow<'_, str>) -> String {
    const MAX_CHARS: usize = 1024;
    let mut chars = text.chars();
    let mut preview = String::new();
    for _ in 0..MAX_CHARS {
        match chars.next() {
            Some(ch) => preview.push(ch),
            None => return preview,
        }
    }
    if chars.next().is_some() {
        preview.push('…');
    }
    preview
}
