//! Health command
//!
//! Runs the data source health check and reports it the way the host does:
//! a failure raised by the check becomes an `error` result carrying the
//! failure message.

use crate::config::Config;
use crate::datasource::DataSource;
use crate::error::Result;
use crate::model::{HealthCheckResult, HealthStatus};
use colored::Colorize;

/// Run the health command
///
/// # Returns
///
/// The reported result; the caller decides the exit status.
///
/// # Errors
///
/// Returns an error only if the data source cannot be constructed or the
/// result cannot be serialized.
pub async fn run_health(config: &Config, json: bool) -> Result<HealthCheckResult> {
    let datasource = DataSource::from_config(config)?;
    let result = into_health_result(datasource.test_datasource().await);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render(&result));
    }
    Ok(result)
}

/// Folds a health-check outcome into the reported result
pub fn into_health_result(outcome: Result<HealthCheckResult>) -> HealthCheckResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            HealthCheckResult::error(format!("{:#}", e))
        }
    }
}

fn render(result: &HealthCheckResult) -> String {
    match result.status {
        HealthStatus::Success => format!("{} {}", "OK".green().bold(), result.message),
        HealthStatus::Error => format!("{} {}", "ERROR".red().bold(), result.message),
    }
}
