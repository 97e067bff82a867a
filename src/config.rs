//! Configuration management for the BRICS data source
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{DatasourceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
///
/// Everything the host would hand the plugin as instance settings, plus the
/// upstream endpoint layout that used to be hard-coded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data source instance identity
    #[serde(default)]
    pub datasource: InstanceConfig,
    /// Upstream endpoint settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Which upstream value ends up in the result table
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Template variable settings
    #[serde(default)]
    pub template: TemplateConfig,
}

/// Data source instance identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Display name
    #[serde(default = "default_instance_name")]
    pub name: String,
    /// Unique identifier
    #[serde(default = "default_instance_name")]
    pub uid: String,
}

fn default_instance_name() -> String {
    "brics".to_string()
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            name: default_instance_name(),
            uid: default_instance_name(),
        }
    }
}

/// Upstream endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL shared by both endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the session token endpoint
    #[serde(default = "default_auth_path")]
    pub auth_path: String,

    /// Path of the data endpoint
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Cookie that carries the session token on data calls
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    /// Per-request timeout applied by the HTTP client (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_auth_path() -> String {
    "/adminJwt".to_string()
}

fn default_data_path() -> String {
    "/get".to_string()
}

fn default_session_cookie() -> String {
    "JSESSIONID".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_path: default_auth_path(),
            data_path: default_data_path(),
            session_cookie: default_session_cookie(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl UpstreamConfig {
    /// Full URL of the session token endpoint
    pub fn auth_url(&self) -> String {
        join_url(&self.base_url, &self.auth_path)
    }

    /// Full URL of the data endpoint
    pub fn data_url(&self) -> String {
        join_url(&self.base_url, &self.data_path)
    }

    /// Client timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Selection of the upstream value placed in result frames
///
/// Both values are placeholders carried over from the plugin scaffold: the
/// record index picks the third record and the constant fills the first
/// value row. Neither has a known business meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Zero-based index of the record whose `occurrences` is reported
    #[serde(default = "default_record_index")]
    pub record_index: usize,

    /// Value emitted in the first row of the value column
    #[serde(default = "default_constant_value")]
    pub constant_value: f64,
}

fn default_record_index() -> usize {
    2
}

fn default_constant_value() -> f64 {
    3.0
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            record_index: default_record_index(),
            constant_value: default_constant_value(),
        }
    }
}

/// Template variable configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Query text resolved on every request
    #[serde(default = "default_query_template")]
    pub query: String,

    /// Instance-level variables, overridden by request-scoped ones
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

fn default_query_template() -> String {
    "$brics".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            query: default_query_template(),
            variables: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged. Environment variables are applied next, then CLI overrides.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found: {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(DatasourceError::from)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(DatasourceError::from)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("BRICS_BASE_URL") {
            self.upstream.base_url = base_url;
        }

        if let Ok(auth_path) = std::env::var("BRICS_AUTH_PATH") {
            self.upstream.auth_path = auth_path;
        }

        if let Ok(data_path) = std::env::var("BRICS_DATA_PATH") {
            self.upstream.data_path = data_path;
        }

        if let Ok(cookie) = std::env::var("BRICS_SESSION_COOKIE") {
            self.upstream.session_cookie = cookie;
        }

        if let Ok(timeout) = std::env::var("BRICS_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.upstream.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid BRICS_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(index) = std::env::var("BRICS_RECORD_INDEX") {
            if let Ok(value) = index.parse() {
                self.extraction.record_index = value;
            } else {
                tracing::warn!("Invalid BRICS_RECORD_INDEX: {}", index);
            }
        }

        if let Ok(constant) = std::env::var("BRICS_CONSTANT_VALUE") {
            if let Ok(value) = constant.parse() {
                self.extraction.constant_value = value;
            } else {
                tracing::warn!("Invalid BRICS_CONSTANT_VALUE: {}", constant);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.upstream.base_url = base_url.clone();
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `DatasourceError::Config` describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.upstream.base_url).map_err(|e| {
            DatasourceError::Config(format!(
                "upstream.base_url '{}' is not a valid URL: {}",
                self.upstream.base_url, e
            ))
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(DatasourceError::Config(format!(
                "upstream.base_url must use http or https, got '{}'",
                base.scheme()
            ))
            .into());
        }

        for (key, path) in [
            ("upstream.auth_path", &self.upstream.auth_path),
            ("upstream.data_path", &self.upstream.data_path),
        ] {
            if !path.starts_with('/') {
                return Err(
                    DatasourceError::Config(format!("{} must start with '/'", key)).into(),
                );
            }
        }

        let cookie = &self.upstream.session_cookie;
        if cookie.is_empty()
            || cookie
                .chars()
                .any(|c| c == '=' || c == ';' || c.is_whitespace())
        {
            return Err(DatasourceError::Config(format!(
                "upstream.session_cookie '{}' is not a valid cookie name",
                cookie
            ))
            .into());
        }

        if self.upstream.timeout_seconds == 0 {
            return Err(DatasourceError::Config(
                "upstream.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !self.extraction.constant_value.is_finite() {
            return Err(DatasourceError::Config(
                "extraction.constant_value must be a finite number".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
