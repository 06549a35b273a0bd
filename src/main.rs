//! CLI entry point for the stop grouper.
//!
//! Provides subcommands for grouping a JSON file of labeled record sets by
//! stop number, writing a per-stop CSV summary, and logging label statistics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::ffi::OsStr;
use std::path::Path;
use stop_grouper::{
    GroupingConfig, StopAggregate, StopGrouper,
    grouping::parse_labeled_sets,
    output::{GroupedReport, print_json, print_pretty, write_json, write_summary_csv},
    stats::GroupingStats,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "stop_grouper")]
#[command(about = "Group labeled record sets by stop number", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group a JSON input file and write the grouped report as JSON
    Group {
        /// Path to a JSON array of labeled record sets
        #[arg(value_name = "INPUT")]
        input: String,

        /// JSON file to write the report to (logged when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// JSON file overriding the input field names
        #[arg(short, long)]
        config: Option<String>,

        /// Pretty-print the JSON report
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Group a JSON input file and write a per-stop, per-label CSV summary
    Summary {
        /// Path to a JSON array of labeled record sets
        #[arg(value_name = "INPUT")]
        input: String,

        /// CSV file to write
        #[arg(short, long, default_value = "stop_summary.csv")]
        output: String,

        /// JSON file overriding the input field names
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Group a JSON input file and log per-label totals and coverage
    Stats {
        /// Path to a JSON array of labeled record sets
        #[arg(value_name = "INPUT")]
        input: String,

        /// JSON file overriding the input field names
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/stop_grouper.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("stop_grouper.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", LevelFilter::INFO));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Group {
            input,
            output,
            config,
            pretty,
        } => {
            let (labels, stops) = load_and_group(&input, config.as_deref())?;
            let report = GroupedReport::new(labels, stops);
            print_pretty(&report);

            match output {
                Some(path) => write_json(&path, &report, pretty)?,
                None => print_json(&report)?,
            }
        }
        Commands::Summary {
            input,
            output,
            config,
        } => {
            let (_, stops) = load_and_group(&input, config.as_deref())?;
            write_summary_csv(&output, &stops)?;
        }
        Commands::Stats { input, config } => {
            let (labels, stops) = load_and_group(&input, config.as_deref())?;
            let stats = GroupingStats::from_aggregates(&labels, &stops);

            for label in &stats.labels {
                info!(
                    label = %label.label,
                    records = label.records,
                    stops_touched = label.stops_touched,
                    coverage_pct = stats.coverage_pct(&label.label),
                    "Label"
                );
            }

            info!(
                stops = stats.stops,
                total_records = stats.total_records,
                labels = stats.labels.len(),
                "Grouping summary"
            );
        }
    }

    Ok(())
}

/// Builds a filter from `var`, falling back to `default` only when `var` is unset or empty.
fn env_filter(var: &str, default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(var)
        .from_env_lossy()
}

/// Resolves the field-name config: `--config`, then `STOP_GROUPER_CONFIG`, then defaults.
fn load_config(path: Option<&str>) -> Result<GroupingConfig> {
    let path = path
        .map(str::to_string)
        .or_else(|| std::env::var("STOP_GROUPER_CONFIG").ok());

    match path {
        Some(path) => {
            info!(path = %path, "Loading grouping config");
            GroupingConfig::load(&path).with_context(|| format!("Failed to load config {path}"))
        }
        None => Ok(GroupingConfig::default()),
    }
}

/// Reads the input file, validates it, and groups it by stop number.
#[tracing::instrument(skip(config_path))]
fn load_and_group(
    input: &str,
    config_path: Option<&str>,
) -> Result<(Vec<String>, Vec<StopAggregate>)> {
    let grouper = StopGrouper::new(load_config(config_path)?);

    let content =
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?;
    let value: Value =
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {input}"))?;

    let sets = parse_labeled_sets(&value, grouper.config())?;
    let labels = sets.iter().map(|s| s.label().to_string()).collect();
    let stops = grouper.group(&sets)?;

    info!(sets = sets.len(), stops = stops.len(), "Input grouped");
    Ok((labels, stops))
}
