//! Command-line interface definition for the BRICS data source
//!
//! The CLI plays the role of the dashboard host: it builds query requests
//! and health checks, invokes the data source, and reports the outcome.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BRICS data source - run dashboard queries against the upstream service
#[derive(Parser, Debug, Clone)]
#[command(name = "brics-datasource")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "BRICS_JSON_LOGS")]
    pub json_logs: bool,

    /// Override the upstream base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a query and print the result frames
    Query {
        /// Range start (epoch milliseconds or RFC 3339)
        #[arg(long, required_unless_present = "request")]
        from: Option<String>,

        /// Range end (epoch milliseconds or RFC 3339)
        #[arg(long, required_unless_present = "request")]
        to: Option<String>,

        /// Target response identifier (repeatable, default: A)
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Scoped template variable as NAME=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_key_value)]
        vars: Vec<(String, String)>,

        /// Read a host query request (JSON) instead of building one
        #[arg(long, conflicts_with_all = ["from", "to", "targets", "vars"])]
        request: Option<PathBuf>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the data source health check
    Health {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_health() {
        let cli = Cli::try_parse_from(["brics-datasource", "health"]).unwrap();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(matches!(cli.command, Commands::Health { json: false }));
    }

    #[test]
    fn test_cli_parse_query_with_targets_and_vars() {
        let cli = Cli::try_parse_from([
            "brics-datasource",
            "query",
            "--from",
            "1000",
            "--to",
            "2000",
            "-t",
            "A",
            "--target",
            "B",
            "--var",
            "brics=BR",
            "--json",
        ])
        .unwrap();

        if let Commands::Query {
            from,
            to,
            targets,
            vars,
            request,
            json,
        } = cli.command
        {
            assert_eq!(from.as_deref(), Some("1000"));
            assert_eq!(to.as_deref(), Some("2000"));
            assert_eq!(targets, vec!["A", "B"]);
            assert_eq!(vars, vec![("brics".to_string(), "BR".to_string())]);
            assert!(request.is_none());
            assert!(json);
        } else {
            panic!("Expected Query command");
        }
    }

    #[test]
    fn test_cli_query_requires_range() {
        let result = Cli::try_parse_from(["brics-datasource", "query", "--from", "1000"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_query_from_request_file() {
        let cli =
            Cli::try_parse_from(["brics-datasource", "query", "--request", "req.json"]).unwrap();
        if let Commands::Query { request, .. } = cli.command {
            assert_eq!(request, Some(PathBuf::from("req.json")));
        } else {
            panic!("Expected Query command");
        }
    }

    #[test]
    fn test_cli_rejects_malformed_var() {
        let result = Cli::try_parse_from([
            "brics-datasource",
            "query",
            "--from",
            "1",
            "--to",
            "2",
            "--var",
            "novalue",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_base_url_flag() {
        let cli = Cli::try_parse_from([
            "brics-datasource",
            "--base-url",
            "http://svc:9000",
            "health",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://svc:9000"));
    }

    #[test]
    fn test_cli_json_logs_flag() {
        let cli = Cli::try_parse_from(["brics-datasource", "--json-logs", "-v", "health"]).unwrap();
        assert!(cli.json_logs);
        assert!(cli.verbose);
    }
}
