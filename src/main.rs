//! BRICS data source - command-line entry point
//!
//! Runs the data source operations the dashboard host would invoke.

use anyhow::Result;

use brics_datasource::cli::{Cli, Commands};
use brics_datasource::commands;
use brics_datasource::commands::query::QueryArgs;
use brics_datasource::config::Config;
use brics_datasource::logging::{self, LogOptions};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Logging first so configuration warnings are not lost
    logging::init_tracing(LogOptions::from_cli(&cli));

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Query {
            from,
            to,
            targets,
            vars,
            request,
            json,
        } => {
            tracing::info!("Starting query");
            let args = QueryArgs {
                from,
                to,
                targets,
                vars,
                request,
                json,
            };
            commands::query::run_query(&config, args).await?;
            Ok(())
        }
        Commands::Health { json } => {
            tracing::info!("Starting health check");
            let result = commands::health::run_health(&config, json).await?;
            if !result.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

