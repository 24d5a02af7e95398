//! ppaas API client
//!
//! Main client for interacting with the service, combining the loaded
//! configuration and the HTTP layer. Paths are resolved against the
//! configured endpoint and credentials are sent as basic auth on every call.

use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::http::HttpClient;
use crate::config::Config;
use crate::error::Result;

/// Handle to one ppaas API endpoint.
///
/// Cheap to clone: clones share nothing beyond the pooled transport sockets,
/// so each resource object can carry its own handle.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: Config,
    http: HttpClient,
}

impl ApiClient {
    /// Create a client from an explicit configuration.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            config,
        })
    }

    /// Create a client from the default configuration locations (see
    /// [`Config::load`]).
    pub fn from_default_locations() -> Result<Self> {
        Self::new(Config::load()?)
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        self.config.endpoint.as_str()
    }

    /// Make a GET request to an API path.
    pub async fn get(&self, path: &str) -> Result<(Value, StatusCode)> {
        self.request(Method::GET, path, None, None).await
    }

    /// Make a POST request to an API path, with an optional JSON body.
    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<(Value, StatusCode)> {
        self.request(Method::POST, path, None, body).await
    }

    /// Make a PUT request to an API path, with an optional JSON body.
    pub async fn put(&self, path: &str, body: Option<&Value>) -> Result<(Value, StatusCode)> {
        self.request(Method::PUT, path, None, body).await
    }

    /// Make a DELETE request to an API path.
    pub async fn delete(&self, path: &str) -> Result<(Value, StatusCode)> {
        self.request(Method::DELETE, path, None, None).await
    }

    /// Issue one call against the API.
    ///
    /// Building block for the verb helpers; public so callers can reach
    /// endpoints this crate has no wrapper for.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
    ) -> Result<(Value, StatusCode)> {
        let url = self.url(path);
        self.http
            .request(method, &url, &self.config.user, &self.config.pass, query, body)
            .await
    }

    /// Build the absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
