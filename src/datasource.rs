//! The query adapter
//!
//! [`DataSource`] implements the two operations the dashboard host calls:
//! `query`, which turns a request into one result frame per target, and
//! `test_datasource`, the health check.
//!
//! A query runs strictly in sequence: resolve the query template, obtain a
//! fresh session token, fetch the record array with that token, then build
//! frames. Any failure aborts the whole request; no partial frames are
//! returned.

use crate::config::{Config, ExtractionConfig};
use crate::error::Result;
use crate::frame::{DataFrame, Field};
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::model::{HealthCheckResult, QueryRequest, QueryResponse};
use crate::template::{TemplateResolver, VariableTemplateResolver};
use crate::upstream::UpstreamClient;
use std::sync::Arc;

/// Name of the time column in every frame
pub const TIME_FIELD: &str = "Time";
/// Name of the value column in every frame
pub const VALUE_FIELD: &str = "Value";
/// Message reported by a successful health check
pub const HEALTH_OK_MESSAGE: &str = "Success";

/// Host-supplied identity of this data source instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSettings {
    /// Display name
    pub name: String,
    /// Unique identifier
    pub uid: String,
}

impl From<&crate::config::InstanceConfig> for InstanceSettings {
    fn from(config: &crate::config::InstanceConfig) -> Self {
        Self {
            name: config.name.clone(),
            uid: config.uid.clone(),
        }
    }
}

/// Query adapter between the host and the upstream endpoints
pub struct DataSource {
    settings: InstanceSettings,
    upstream: UpstreamClient,
    templates: Arc<dyn TemplateResolver>,
    query_template: String,
    extraction: ExtractionConfig,
}

impl DataSource {
    /// Creates a data source with explicitly injected collaborators
    ///
    /// # Arguments
    ///
    /// * `settings` - Instance identity, used for logging
    /// * `config` - Endpoint, extraction and template settings
    /// * `http` - HTTP capability used for every upstream call
    /// * `templates` - Template variable resolver
    pub fn new(
        settings: InstanceSettings,
        config: &Config,
        http: Arc<dyn HttpClient>,
        templates: Arc<dyn TemplateResolver>,
    ) -> Self {
        Self {
            settings,
            upstream: UpstreamClient::new(http, config.upstream.clone()),
            templates,
            query_template: config.template.query.clone(),
            extraction: config.extraction.clone(),
        }
    }

    /// Creates a data source with the production HTTP client and resolver
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use brics_datasource::config::Config;
    /// use brics_datasource::datasource::DataSource;
    /// use brics_datasource::model::{QueryRequest, Target, TimeRange};
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let ds = DataSource::from_config(&Config::default())?;
    /// let request = QueryRequest::new(TimeRange::new(1000, 2000), vec![Target::new("A")]);
    /// let response = ds.query(&request).await?;
    /// assert_eq!(response.data.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Arc::new(ReqwestHttpClient::new(config.upstream.timeout())?);
        let templates = Arc::new(VariableTemplateResolver::new(
            config.template.variables.clone(),
        ));
        Ok(Self::new(
            InstanceSettings::from(&config.datasource),
            config,
            http,
            templates,
        ))
    }

    /// Instance identity
    pub fn settings(&self) -> &InstanceSettings {
        &self.settings
    }

    /// Answers a host query with one frame per target
    ///
    /// Every frame has a `Time` column equal to `[from, to]` and a `Value`
    /// column equal to `[constant_value, occurrences]`, where `occurrences`
    /// comes from the configured record of the upstream array. Frames keep
    /// the order and `refId` of the request targets.
    ///
    /// # Errors
    ///
    /// Fails the whole request on any transport failure, non-2xx upstream
    /// status, malformed body, or an upstream array too short for the
    /// configured record index.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        tracing::debug!(
            datasource = %self.settings.name,
            from = request.range.from,
            to = request.range.to,
            ref_ids = ?request.ref_ids(),
            "Received query"
        );

        let resolved = self
            .templates
            .replace(&self.query_template, &request.scoped_vars);
        tracing::debug!(query = %resolved, "Resolved query template");

        let token = self.upstream.fetch_session_token().await?;
        let records = self.upstream.fetch_records(&token).await?;
        let occurrences = records.occurrences_at(self.extraction.record_index)?;

        let data = request
            .targets
            .iter()
            .map(|target| -> Result<DataFrame> {
                let frame = DataFrame::new(target.ref_id.clone())
                    .with_field(Field::time(
                        TIME_FIELD,
                        vec![request.range.from, request.range.to],
                    ))
                    .with_field(Field::number(
                        VALUE_FIELD,
                        vec![self.extraction.constant_value, occurrences as f64],
                    ));
                frame.validate()?;
                Ok(frame)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            datasource = %self.settings.name,
            frames = data.len(),
            occurrences,
            "Query completed"
        );
        Ok(QueryResponse { data })
    }

    /// Health check
    ///
    /// Calls the data endpoint without a session token and reports success
    /// once the call returns, whatever its status or body.
    ///
    /// # Errors
    ///
    /// Transport failures propagate; the host turns them into a failed check.
    pub async fn test_datasource(&self) -> Result<HealthCheckResult> {
        let response = self.upstream.ping().await?;
        tracing::info!(
            datasource = %self.settings.name,
            status = response.status,
            "Health check completed"
        );
        Ok(HealthCheckResult::success(HEALTH_OK_MESSAGE))
    }
}
