//! BRICS data source - dashboard query adapter library
//!
//! This library turns dashboard query requests into two sequential calls
//! against an upstream service (a session token endpoint, then a data
//! endpoint) and shapes the returned value into time-series result frames.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `datasource`: The query adapter (`query` and `test_datasource`)
//! - `upstream`: Session token and data endpoint calls, record decoding
//! - `http`: Injected HTTP capability and its `reqwest` implementation
//! - `template`: Injected template variable resolution
//! - `model`: Host request, response and health-check types
//! - `frame`: Result tables
//! - `config`: Configuration management and validation
//! - `logging`: Tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use brics_datasource::{Config, DataSource};
//! use brics_datasource::model::{QueryRequest, Target, TimeRange};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let datasource = DataSource::from_config(&config)?;
//!     let request = QueryRequest::new(TimeRange::new(1000, 2000), vec![Target::new("A")]);
//!     let response = datasource.query(&request).await?;
//!     println!("{}", serde_json::to_string(&response)?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod datasource;
pub mod error;
pub mod frame;
pub mod http;
pub mod logging;
pub mod model;
pub mod template;
pub mod upstream;

// Re-export commonly used types
pub use config::Config;
pub use datasource::{DataSource, InstanceSettings};
pub use error::{DatasourceError, Result};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use template::{TemplateResolver, VariableTemplateResolver};

#[cfg(test)]
pub mod test_utils;
