//! Tracing subscriber setup
//!
//! Log options come from the command line only, so the subscriber can be
//! installed before configuration is loaded and nothing logged while loading
//! it is dropped.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How log output is filtered and formatted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Lower the default level to debug
    pub verbose: bool,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LogOptions {
    /// Options selected on the command line
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            verbose: cli.verbose,
            json: cli.json_logs,
        }
    }

    /// Filter from `RUST_LOG`, falling back to the verbosity default
    pub fn env_filter(&self) -> EnvFilter {
        let default_level = if self.verbose {
            "brics_datasource=debug"
        } else {
            "brics_datasource=info"
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    }
}

/// Builds a subscriber writing to `writer`
pub fn subscriber<W>(options: LogOptions, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(options.env_filter());
    if options.json {
        Box::new(registry.with(tracing_subscriber::fmt::layer().json().with_writer(writer)))
    } else {
        Box::new(registry.with(tracing_subscriber::fmt::layer().with_writer(writer)))
    }
}

/// Installs the global subscriber, logging to stderr
pub fn init_tracing(options: LogOptions) {
    subscriber(options, std::io::stderr).init();
}
