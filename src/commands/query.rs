//! Query command
//!
//! Builds a host query request from CLI arguments (or reads one from a JSON
//! file), runs it through the data source and prints the frames.

use crate::config::Config;
use crate::datasource::DataSource;
use crate::error::{DatasourceError, Result};
use crate::frame::{DataFrame, FieldValues};
use crate::model::{parse_instant, QueryRequest, QueryResponse, Target, TimeRange};
use chrono::{TimeZone, Utc};
use colored::Colorize;
use prettytable::{format, Table};
use std::path::PathBuf;

/// Target used when none is given on the command line
pub const DEFAULT_REF_ID: &str = "A";

/// Query command arguments
#[derive(Debug, Clone, Default)]
pub struct QueryArgs {
    /// Range start as typed by the user
    pub from: Option<String>,
    /// Range end as typed by the user
    pub to: Option<String>,
    /// Target response identifiers
    pub targets: Vec<String>,
    /// Scoped template variables
    pub vars: Vec<(String, String)>,
    /// Host request file, used instead of the fields above
    pub request: Option<PathBuf>,
    /// Print JSON instead of tables
    pub json: bool,
}

/// Run the query command
///
/// # Errors
///
/// Returns an error if the request cannot be built or the query fails.
pub async fn run_query(config: &Config, args: QueryArgs) -> Result<()> {
    let request = build_request(&args)?;
    tracing::info!(
        targets = request.targets.len(),
        from = request.range.from,
        to = request.range.to,
        "Running query"
    );

    let datasource = DataSource::from_config(config)?;
    let response = datasource.query(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_tables(&response));
    }
    Ok(())
}

/// Builds the query request described by the arguments
///
/// # Errors
///
/// Returns `DatasourceError::InvalidTimeRange` when the range is missing or
/// unparsable, or an IO/JSON error when the request file cannot be read.
pub fn build_request(args: &QueryArgs) -> Result<QueryRequest> {
    if let Some(path) = &args.request {
        let contents = std::fs::read_to_string(path).map_err(DatasourceError::from)?;
        let request: QueryRequest =
            serde_json::from_str(&contents).map_err(DatasourceError::from)?;
        return Ok(request);
    }

    let from = args
        .from
        .as_deref()
        .ok_or_else(|| DatasourceError::InvalidTimeRange("missing --from".to_string()))?;
    let to = args
        .to
        .as_deref()
        .ok_or_else(|| DatasourceError::InvalidTimeRange("missing --to".to_string()))?;
    let range = TimeRange::new(parse_instant(from)?, parse_instant(to)?);

    let targets = if args.targets.is_empty() {
        vec![Target::new(DEFAULT_REF_ID)]
    } else {
        args.targets.iter().map(Target::new).collect()
    };

    let request = args
        .vars
        .iter()
        .fold(QueryRequest::new(range, targets), |req, (name, value)| {
            req.with_scoped_var(name.clone(), value.clone())
        });
    Ok(request)
}

/// Renders every frame as a table, one after another
pub fn render_tables(response: &QueryResponse) -> String {
    if response.data.is_empty() {
        return format!("{}\n", "No frames returned.".yellow());
    }

    let mut out = String::new();
    for frame in &response.data {
        out.push_str(&format!("\nFrame {}:\n", frame.ref_id.cyan()));
        out.push_str(&frame_table(frame).to_string());
    }
    out
}

fn frame_table(frame: &DataFrame) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.set_titles(prettytable::Row::new(
        frame
            .fields
            .iter()
            .map(|f| prettytable::Cell::new(&f.name))
            .collect(),
    ));

    for row in 0..frame.len() {
        let cells = frame
            .fields
            .iter()
            .map(|field| {
                let text = match &field.values {
                    FieldValues::Time(v) => v.get(row).map(|ms| format_millis(*ms)),
                    FieldValues::Number(v) => v.get(row).map(|n| n.to_string()),
                };
                prettytable::Cell::new(&text.unwrap_or_default())
            })
            .collect();
        table.add_row(prettytable::Row::new(cells));
    }
    table
}

fn format_millis(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.to_rfc3339(),
        None => ms.to_string(),
    }
}
