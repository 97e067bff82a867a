//! Host-facing request and response types
//!
//! These mirror the JSON the dashboard host exchanges with a data source:
//! a query request carrying a time range, targets and scoped template
//! variables, and the response and health-check envelopes sent back.

use crate::error::{DatasourceError, Result};
use crate::frame::DataFrame;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query time range as epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Range start
    pub from: i64,
    /// Range end
    pub to: i64,
}

impl TimeRange {
    /// Creates a range from two epoch-millisecond instants
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }
}

/// One sub-query of a host request
///
/// Only `refId` is interpreted; everything else the query editor stored is
/// kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Caller-assigned response identifier
    #[serde(rename = "refId")]
    pub ref_id: String,

    /// Whether the panel hides this target
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide: bool,

    /// Remaining editor fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Target {
    /// Creates a target with only a response identifier
    pub fn new(ref_id: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            hide: false,
            extra: serde_json::Map::new(),
        }
    }
}

/// A request-scoped template variable value
///
/// Hosts send numbers for built-ins such as `__interval_ms`, so both fields
/// are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopedVar {
    /// Display text
    #[serde(default)]
    pub text: serde_json::Value,
    /// Substituted value
    #[serde(default)]
    pub value: serde_json::Value,
}

impl ScopedVar {
    /// Creates a scoped variable whose text and value are identical
    pub fn new(value: impl Into<String>) -> Self {
        let value = serde_json::Value::String(value.into());
        Self {
            text: value.clone(),
            value,
        }
    }

    /// Value as it is substituted into a template
    ///
    /// Strings are used verbatim, null becomes empty and anything else is
    /// rendered as compact JSON.
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Template variables supplied with a single request
pub type ScopedVars = BTreeMap<String, ScopedVar>;

/// One invocation of the query operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Requested time range
    pub range: TimeRange,
    /// Targets in panel order
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Request-scoped template variables
    #[serde(rename = "scopedVars", default)]
    pub scoped_vars: ScopedVars,
}

impl QueryRequest {
    /// Creates a request with no scoped variables
    pub fn new(range: TimeRange, targets: Vec<Target>) -> Self {
        Self {
            range,
            targets,
            scoped_vars: ScopedVars::new(),
        }
    }

    /// Adds a scoped template variable
    pub fn with_scoped_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.scoped_vars.insert(name.into(), ScopedVar::new(value));
        self
    }

    /// Response identifiers of all targets, in order
    pub fn ref_ids(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.ref_id.as_str()).collect()
    }
}

/// Result of the query operation: one frame per target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    /// Frames in target order
    pub data: Vec<DataFrame>,
}

/// Health-check outcome reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The data source is usable
    Success,
    /// The data source is not usable
    Error,
}

/// Health-check response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Outcome
    pub status: HealthStatus,
    /// Message shown to the user
    pub message: String,
}

impl HealthCheckResult {
    /// Successful health check
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Success,
            message: message.into(),
        }
    }

    /// Failed health check
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
        }
    }

    /// Whether the status is `success`
    pub fn is_success(&self) -> bool {
        self.status == HealthStatus::Success
    }
}

/// Parses a time instant given as epoch milliseconds or RFC 3339
///
/// # Errors
///
/// Returns `DatasourceError::InvalidTimeRange` when the text is neither.
///
/// # Examples
///
/// ```
/// use brics_datasource::model::parse_instant;
///
/// assert_eq!(parse_instant("1000").unwrap(), 1000);
/// assert_eq!(parse_instant("1970-01-01T00:00:02Z").unwrap(), 2000);
/// ```
pub fn parse_instant(text: &str) -> Result<i64> {
    let text = text.trim();
    if let Ok(millis) = text.parse::<i64>() {
        return Ok(millis);
    }
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| {
            DatasourceError::InvalidTimeRange(format!(
                "'{}' is neither epoch milliseconds nor RFC 3339: {}",
                text, e
            ))
            .into()
        })
}
