//! Calls against the upstream session and data endpoints
//!
//! The upstream exposes two plain GET endpoints:
//!
//! - the auth endpoint, whose whole body is an opaque session token
//! - the data endpoint, which expects the token in a session cookie and
//!   answers with a JSON array of `{date, occurrences}` records
//!
//! Tokens are fetched per query and never reused.

use crate::config::UpstreamConfig;
use crate::error::{DatasourceError, Result};
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One entry returned by the data endpoint
///
/// `date` is kept in whatever shape the upstream serializes it (epoch millis,
/// text, a `[y, m, d]` array or null); only `occurrences` is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamRecord {
    /// When the occurrences were counted
    #[serde(default)]
    pub date: serde_json::Value,
    /// Occurrence count
    pub occurrences: i64,
}

/// Decoded, validated data endpoint response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<UpstreamRecord>,
}

impl RecordSet {
    /// Decodes a raw data endpoint body
    ///
    /// # Errors
    ///
    /// Returns `DatasourceError::Decode` when the body is not a JSON array of
    /// records or a record lacks `occurrences`.
    ///
    /// # Examples
    ///
    /// ```
    /// use brics_datasource::upstream::RecordSet;
    ///
    /// let set = RecordSet::decode(r#"[{"date": 0, "occurrences": 4}]"#).unwrap();
    /// assert_eq!(set.occurrences_at(0).unwrap(), 4);
    /// assert!(set.occurrences_at(2).is_err());
    /// ```
    pub fn decode(body: &str) -> Result<Self> {
        let records: Vec<UpstreamRecord> = serde_json::from_str(body).map_err(|e| {
            DatasourceError::Decode(format!("data endpoint returned unexpected body: {}", e))
        })?;
        Ok(Self { records })
    }

    /// Occurrence count of the record at `index`
    ///
    /// # Errors
    ///
    /// Returns `DatasourceError::InsufficientRecords` when fewer than
    /// `index + 1` records were returned.
    pub fn occurrences_at(&self, index: usize) -> Result<i64> {
        self.records
            .get(index)
            .map(|r| r.occurrences)
            .ok_or_else(|| {
                DatasourceError::InsufficientRecords {
                    required: index.saturating_add(1),
                    available: self.records.len(),
                }
                .into()
            })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were returned
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in upstream order
    pub fn records(&self) -> &[UpstreamRecord] {
        &self.records
    }
}

/// Opaque credential returned by the auth endpoint
///
/// The body is kept verbatim. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Cookie` header value carrying this token
    pub fn cookie_header(&self, cookie_name: &str) -> String {
        format!("{}={}", cookie_name, self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} bytes>)", self.0.len())
    }
}

/// Client for the two upstream endpoints
#[derive(Clone)]
pub struct UpstreamClient {
    http: Arc<dyn HttpClient>,
    config: UpstreamConfig,
}

impl fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UpstreamClient {
    /// Creates a client over an injected HTTP capability
    pub fn new(http: Arc<dyn HttpClient>, config: UpstreamConfig) -> Self {
        Self { http, config }
    }

    /// Endpoint configuration
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Obtains a fresh session token
    ///
    /// # Errors
    ///
    /// Propagates transport failures; returns `DatasourceError::UpstreamStatus`
    /// for a non-2xx answer. The body itself is not validated.
    pub async fn fetch_session_token(&self) -> Result<SessionToken> {
        let response = self
            .http
            .get(HttpRequest::get(self.config.auth_url()))
            .await?;
        let response = self.require_success(&self.config.auth_path, response)?;

        let token = SessionToken::new(response.body);
        tracing::debug!(token = ?token, "Obtained session token");
        Ok(token)
    }

    /// Fetches the record array using a session token
    ///
    /// # Errors
    ///
    /// Propagates transport failures; returns `DatasourceError::UpstreamStatus`
    /// for a non-2xx answer and `DatasourceError::Decode` for a malformed body.
    pub async fn fetch_records(&self, token: &SessionToken) -> Result<RecordSet> {
        let request = HttpRequest::get(self.config.data_url())
            .with_header("Cookie", token.cookie_header(&self.config.session_cookie));
        let response = self.http.get(request).await?;
        let response = self.require_success(&self.config.data_path, response)?;

        let records = RecordSet::decode(&response.body)?;
        tracing::debug!(records = records.len(), "Received upstream records");
        Ok(records)
    }

    /// Calls the data endpoint without credentials
    ///
    /// The response is returned as-is; its status and body are not checked.
    ///
    /// # Errors
    ///
    /// Only transport failures are reported.
    pub async fn ping(&self) -> Result<HttpResponse> {
        let request = HttpRequest::get(self.config.data_url()).with_header("mode", "no-cors");
        let response = self.http.get(request).await?;
        tracing::debug!(status = response.status, "Data endpoint answered");
        Ok(response)
    }

    fn require_success(&self, endpoint: &str, response: HttpResponse) -> Result<HttpResponse> {
        if response.is_success() {
            return Ok(response);
        }
        tracing::error!(
            endpoint = %endpoint,
            status = response.status,
            "Upstream returned a failure status"
        );
        Err(DatasourceError::UpstreamStatus {
            endpoint: endpoint.to_string(),
            status: response.status,
            body: response.body,
        }
        .into())
    }
}
