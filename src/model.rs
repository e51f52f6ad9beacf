//! Record types flowing through the disruption pipeline.
//!
//! Absent and unparseable values are carried as `None` all the way to the
//! exporter, which is the only place the `Unknown` sentinel is written.

use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Sentinel written for absent or undefined values on export.
pub const UNKNOWN: &str = "Unknown";

/// Category returned when no keyword matches.
pub const OTHERS: &str = "Others";

pub type Timestamp = DateTime<FixedOffset>;

/// One situation × affected-stop pair, with values as found in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SituationStopRecord {
    pub situation_id: Option<String>,
    pub operator_code: Option<String>,
    pub summary: Option<String>,
    /// Empty when the situation carries no description.
    pub description: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub planned: Option<String>,
    pub severity: Option<String>,
    pub stop_name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// A [`SituationStopRecord`] with its times, coordinates and flags typed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStop {
    pub situation_id: Option<String>,
    pub operator_code: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub planned: Option<bool>,
    pub severity: Severity,
    pub stop_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Consequence severity as published by the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    #[default]
    Unknown,
    Normal,
    Slight,
    Severe,
    VerySevere,
    VerySlight,
    /// Any label outside the canonical set, kept verbatim.
    Other(String),
}

impl Severity {
    pub fn label(&self) -> &str {
        match self {
            Severity::Unknown => "Unknown",
            Severity::Normal => "Normal",
            Severity::Slight => "Slight",
            Severity::Severe => "Severe",
            Severity::VerySevere => "Very Severe",
            Severity::VerySlight => "Very Slight",
            Severity::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One consolidated disruption, keyed by situation number.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationRecord {
    pub situation_id: Option<String>,
    pub operator_code: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    /// Unique stop names in first-seen order.
    pub stop_names: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub planned: Option<bool>,
    pub severity: Severity,
    pub is_end_time_unknown: bool,
    pub duration_hours: Option<f64>,
    pub detailed_category: String,
    pub broad_category: String,
}

impl SituationRecord {
    pub fn stop_name_list(&self) -> String {
        self.stop_names.join(", ")
    }
}
