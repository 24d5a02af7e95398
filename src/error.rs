//! Error taxonomy for the ppaas API.
//!
//! Every failure surfaces to the caller as one of these variants; resource
//! operations never catch or translate transport errors.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All the ways a ppaas API call can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// None of the default configuration locations exist.
    #[error("no configuration file found (tried ppaas.conf, ~/.ppaas.conf and /etc/ppaas.conf)")]
    ConfigurationNotFound,

    /// A configuration file exists but could not be read or parsed.
    #[error("invalid configuration file {}: {reason}", .path.display())]
    InvalidConfiguration { path: PathBuf, reason: String },

    /// The API answered with a body that is not JSON, or JSON that does not
    /// match the expected shape.
    #[error("failed to decode API response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// 404: the requested resource does not exist.
    #[error("resource not found: {}", summarize(.0))]
    ResourceNotFound(Value),

    /// 400: the request carried bad parameters.
    #[error("bad request parameters: {}", summarize(.0))]
    BadParameters(Value),

    /// 403: the credentials are not allowed to do this.
    #[error("forbidden: {}", summarize(.0))]
    Forbidden(Value),

    /// The request never completed (connection failure, DNS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other non-2xx status.
    #[error("API error {status}: {}", summarize(.body))]
    Api {
        status: reqwest::StatusCode,
        body: Value,
    },
}

/// Compact single-line rendering of an error body for messages.
///
/// The service usually answers errors with a `message` field; fall back to
/// the raw JSON when it does not.
fn summarize(body: &Value) -> String {
    match body {
        Value::Null => "<empty body>".to_string(),
        Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| other.to_string()),
    }
}
