//! Output formatting and persistence for classified situations.
//!
//! The CSV layout is the interchange format consumed by the analytics
//! dashboard. Undefined values are written as `Unknown`.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use tracing::{debug, info};

use crate::model::{SituationRecord, UNKNOWN};
use crate::normalize::{parse_float, parse_planned, parse_severity, parse_timestamp};
use crate::stats::DatasetSummary;

/// Column order of the exported CSV.
pub const COLUMNS: [&str; 15] = [
    "Situation Number",
    "Operator",
    "Summary",
    "Description",
    "Start Time",
    "End Time",
    "Stop Name",
    "Latitude",
    "Longitude",
    "Planned",
    "Consequence Severity",
    "Duration",
    "Unknown",
    "Detailed Disruption Category",
    "Efficient Disruption Category",
];

/// One CSV row, with every cell already rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Situation Number")]
    pub situation_number: String,
    #[serde(rename = "Operator")]
    pub operator: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Stop Name")]
    pub stop_name: String,
    #[serde(rename = "Latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude")]
    pub longitude: String,
    #[serde(rename = "Planned")]
    pub planned: String,
    #[serde(rename = "Consequence Severity")]
    pub consequence_severity: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Unknown")]
    pub unknown: String,
    #[serde(rename = "Detailed Disruption Category")]
    pub detailed_category: String,
    #[serde(rename = "Efficient Disruption Category")]
    pub efficient_category: String,
}

fn text_or_unknown(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| UNKNOWN.to_string())
}

fn display_or_unknown<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn unknown_to_none(cell: String) -> Option<String> {
    if cell == UNKNOWN { None } else { Some(cell) }
}

impl From<&SituationRecord> for ExportRow {
    fn from(r: &SituationRecord) -> Self {
        ExportRow {
            situation_number: text_or_unknown(&r.situation_id),
            operator: text_or_unknown(&r.operator_code),
            summary: text_or_unknown(&r.summary),
            description: r.description.clone(),
            start_time: display_or_unknown(r.start_time.map(|t| t.to_rfc3339())),
            end_time: display_or_unknown(r.end_time.map(|t| t.to_rfc3339())),
            stop_name: r.stop_name_list(),
            latitude: display_or_unknown(r.latitude),
            longitude: display_or_unknown(r.longitude),
            planned: display_or_unknown(r.planned),
            consequence_severity: r.severity.label().to_string(),
            duration: display_or_unknown(r.duration_hours),
            unknown: if r.is_end_time_unknown { "True" } else { "False" }.to_string(),
            detailed_category: r.detailed_category.clone(),
            efficient_category: r.broad_category.clone(),
        }
    }
}

impl From<ExportRow> for SituationRecord {
    fn from(row: ExportRow) -> Self {
        let stop_names = if row.stop_name.is_empty() {
            Vec::new()
        } else {
            row.stop_name.split(", ").map(str::to_string).collect()
        };

        SituationRecord {
            start_time: parse_timestamp(&row.start_time),
            end_time: parse_timestamp(&row.end_time),
            latitude: parse_float(&row.latitude),
            longitude: parse_float(&row.longitude),
            planned: parse_planned(&row.planned),
            severity: parse_severity(Some(row.consequence_severity.as_str())),
            duration_hours: parse_float(&row.duration),
            is_end_time_unknown: row.unknown.eq_ignore_ascii_case("true"),
            situation_id: unknown_to_none(row.situation_number),
            operator_code: unknown_to_none(row.operator),
            summary: unknown_to_none(row.summary),
            description: row.description,
            stop_names,
            detailed_category: row.detailed_category,
            broad_category: row.efficient_category,
        }
    }
}

/// Logs the dataset summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &DatasetSummary) {
    debug!("{:#?}", summary);
}

/// Logs the dataset summary as pretty-printed JSON.
pub fn print_json(summary: &DatasetSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Writes every record as one CSV row, header first.
pub fn write_records_to<W: Write>(writer: W, records: &[SituationRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    if records.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the dataset to a CSV file at `path`, replacing any existing file.
pub fn write_records(path: &str, records: &[SituationRecord]) -> Result<()> {
    debug!(path, rows = records.len(), "Writing CSV");
    let file = File::create(path).with_context(|| format!("Unable to create {path}"))?;
    write_records_to(file, records)
}

/// Reads records back from CSV produced by [`write_records_to`].
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<SituationRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let row: ExportRow = result?;
        records.push(row.into());
    }

    Ok(records)
}

pub fn read_records(path: &str) -> Result<Vec<SituationRecord>> {
    let file = File::open(path).with_context(|| format!("Unable to open {path}"))?;
    read_records_from(file)
}
