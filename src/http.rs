//! HTTP capability injected into the data source
//!
//! The adapter never builds a network client itself. It receives an
//! [`HttpClient`] at construction time, so tests can substitute a fake and
//! the host can supply whatever transport it owns.
//!
//! # Canonical Import Path
//!
//! ```no_run
//! use brics_datasource::http::{HttpClient, HttpRequest, ReqwestHttpClient};
//! ```

use crate::error::{DatasourceError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// An outbound GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL
    pub url: String,
    /// Extra headers in insertion order
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a GET request without headers
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Adds a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first header with the given name, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully read response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Creates a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over the host-supplied HTTP client
///
/// A transport failure (DNS, connect, timeout) is an `Err`. Any status the
/// server answers with, including 4xx/5xx, is an `Ok` response; callers
/// decide whether the status matters to them.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issues a GET request and reads the whole body
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production [`HttpClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a client with the given per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `DatasourceError::Http` if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DatasourceError::from)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        tracing::debug!(url = %request.url, "Sending upstream request");
        let response = builder
            .send()
            .await
            .map_err(DatasourceError::from)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(DatasourceError::from)?;
        tracing::debug!(url = %request.url, status, bytes = body.len(), "Upstream responded");

        Ok(HttpResponse { status, body })
    }
}
