//! Error taxonomy shared by the client operations.

use reqwest::StatusCode;
use thiserror::Error;

use crate::value::DecodeError;

/// Errors returned by [`crate::ConfigClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// A read accessor ran before any pull succeeded.
    #[error("Configuration was not loaded from the config server (use pull)")]
    ConfigNotPulled,
    /// The server answered with a status the operation does not accept.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// A value or the pulled document could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// Transport-level issue (DNS, TLS, socket, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A header name or value cannot be represented on the wire.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// The TLS client could not be configured.
    #[error("TLS configuration error: {0}")]
    Tls(String),
}

/// Non-success response from the config server.
///
/// The server reports the actual failure reason through the `etag` header,
/// which is kept as [`RequestError::detail`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}: {reason_phrase} - {}", .detail.as_deref().unwrap_or_default())]
pub struct RequestError {
    /// Short description of the operation that failed.
    pub message: String,
    pub status: StatusCode,
    /// Canonical reason phrase for the status (empty for non-standard codes).
    pub reason_phrase: String,
    /// Value of the response's `etag` header, when present.
    pub detail: Option<String>,
}

impl RequestError {
    pub fn new(message: impl Into<String>, status: StatusCode, detail: Option<String>) -> Self {
        Self {
            message: message.into(),
            status,
            reason_phrase: status.canonical_reason().unwrap_or_default().to_string(),
            detail,
        }
    }
}
