//! Output formatting and persistence for grouping results.
//!
//! Supports pretty-printing, JSON serialization, and a per-stop CSV summary.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

use crate::grouping::StopAggregate;

/// Grouped stops plus the metadata a report consumer needs to lay them out.
#[derive(Debug, Serialize)]
pub struct GroupedReport {
    pub generated_at: DateTime<Utc>,
    pub labels: Vec<String>,
    pub stop_count: usize,
    pub stops: Vec<StopAggregate>,
}

impl GroupedReport {
    pub fn new(labels: Vec<String>, stops: Vec<StopAggregate>) -> Self {
        Self {
            generated_at: Utc::now(),
            labels,
            stop_count: stops.len(),
            stops,
        }
    }
}

/// One CSV row: how many records a label has at a stop.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    stop_number: &'a str,
    label: &'a str,
    record_count: usize,
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &GroupedReport) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &GroupedReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a report as JSON to `path`, replacing any existing file.
pub fn write_json(path: &str, report: &GroupedReport, pretty: bool) -> Result<()> {
    debug!(path, pretty, "Writing JSON report");

    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writer.flush()?;

    info!(path, stops = report.stop_count, "JSON report written");
    Ok(())
}

/// Writes one `stop_number,label,record_count` row per stop and label.
///
/// Returns the number of data rows written.
pub fn write_summary_csv(path: &str, stops: &[StopAggregate]) -> Result<usize> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    let mut rows = 0;

    for stop in stops {
        for (label, records) in stop.groups() {
            writer.serialize(SummaryRow {
                stop_number: stop.stop_number().as_str(),
                label,
                record_count: records.len(),
            })?;
            rows += 1;
        }
    }
    writer.flush()?;

    info!(path, rows, "CSV summary written");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by_stop_number;
    use serde_json::json;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_report() -> GroupedReport {
        let input = json!([
            { "key": "inspections", "data": [{ "stopNumber": "3" }, { "stopNumber": "1" }] },
            { "key": "notes", "data": [{ "stopNumber": "1" }] }
        ]);
        let stops = group_by_stop_number(&input).unwrap();
        GroupedReport::new(vec!["inspections".into(), "notes".into()], stops)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_report()).unwrap();
    }

    #[test]
    fn test_write_json_round_trips_stops() {
        let path = temp_path("stop_grouper_test_report.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &sample_report(), true).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["stop_count"], json!(2));
        assert_eq!(value["labels"], json!(["inspections", "notes"]));
        assert_eq!(value["stops"][1]["stopNumber"], json!("3"));
        assert_eq!(value["stops"][1]["notes"], json!([]));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_summary_csv_rows() {
        let path = temp_path("stop_grouper_test_summary.csv");
        let _ = fs::remove_file(&path);

        let report = sample_report();
        let rows = write_summary_csv(&path, &report.stops).unwrap();
        assert_eq!(rows, 4);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "stop_number,label,record_count");
        assert_eq!(lines[1], "1,inspections,1");
        assert_eq!(lines[4], "3,notes,0");
        assert_eq!(lines.len(), 5);

        fs::remove_file(&path).unwrap();
    }
}
