//! Test utilities for the BRICS data source
//!
//! This module provides an in-process [`HttpClient`] fake that answers from
//! canned responses and records every request it receives.

use crate::error::Result;
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Recording fake for [`HttpClient`]
///
/// Responses are keyed by exact URL. A request for a URL without a canned
/// response fails the way a refused connection would.
#[derive(Debug, Default)]
pub struct FakeHttpClient {
    responses: HashMap<String, HttpResponse>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeHttpClient {
    /// Creates a fake with no canned responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the response returned for `url`
    pub fn with_response(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), HttpResponse::new(status, body));
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("FakeHttpClient: request log poisoned")
            .clone()
    }

    /// URLs requested so far, in order
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        self.requests
            .lock()
            .expect("FakeHttpClient: request log poisoned")
            .push(request);

        self.responses
            .get(&url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("FakeHttpClient: connection refused for {}", url))
    }
}
