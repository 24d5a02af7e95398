//! HTTP utilities for ppaas REST API calls
//!
//! One thin wrapper around `reqwest`: issue a request with basic auth, decode
//! the JSON body and classify the status code into the crate's error
//! taxonomy. No retries, no caching at this layer.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::error::{Error, Result};

/// Fixed timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize a response body for logging: keep printable ASCII and truncate.
/// Deploy-key material must never land in logs whole.
fn sanitize_for_log(body: &str) -> String {
    let printable: String = body
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();

    if printable.len() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            &printable[..MAX_LOG_BODY_LENGTH],
            body.len()
        )
    } else {
        printable
    }
}

/// HTTP client wrapper for ppaas API calls
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with the fixed request timeout.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ppaas/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// Issue one request and return the decoded JSON body (JSON null when the
    /// body is empty) together with the status code.
    ///
    /// The body is decoded before the status is classified, so a non-JSON
    /// body is an [`Error::InvalidResponse`] whatever the status was.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        user: &str,
        pass: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
    ) -> Result<(Value, StatusCode)> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url).basic_auth(user, Some(pass));
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let decoded = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        if (100..300).contains(&status.as_u16()) {
            return Ok((decoded, status));
        }

        tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
        Err(classify_status(status, decoded))
    }
}

/// Map a non-success status to its error kind.
fn classify_status(status: StatusCode, body: Value) -> Error {
    match status.as_u16() {
        400 => Error::BadParameters(body),
        403 => Error::Forbidden(body),
        404 => Error::ResourceNotFound(body),
        _ => Error::Api { status, body },
    }
}
