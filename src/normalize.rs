//! Conversion of raw text fields into typed values.
//!
//! Every function here is total: input that fails to parse becomes `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::model::{NormalizedStop, Severity, SituationStopRecord, Timestamp, UNKNOWN};

/// Zoned formats tried after RFC 3339, e.g. `2024-01-01 10:00:00+00:00`.
static ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Formats without an offset; these are read as UTC.
static NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn is_sentinel(text: &str) -> bool {
    text.is_empty() || text.eq_ignore_ascii_case(UNKNOWN)
}

/// Parses a feed timestamp.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if is_sentinel(text) {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts);
    }

    for format in ZONED_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Parses a coordinate or duration. Non-finite values count as undefined.
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses the `Planned` flag, accepting the xs:boolean lexical forms.
pub fn parse_planned(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Maps a severity label onto the canonical set.
///
/// Matching ignores case, spaces, `_` and `-`, so both `verySevere` and
/// `Very Severe` land on [`Severity::VerySevere`]. Unrecognised labels are
/// kept as they are.
pub fn parse_severity(text: Option<&str>) -> Severity {
    let Some(raw) = text else {
        return Severity::Unknown;
    };

    let key: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect();

    match key.as_str() {
        "" | "unknown" => Severity::Unknown,
        "normal" => Severity::Normal,
        "slight" => Severity::Slight,
        "severe" => Severity::Severe,
        "verysevere" => Severity::VerySevere,
        "veryslight" => Severity::VerySlight,
        _ => Severity::Other(raw.to_string()),
    }
}

/// Types the time, coordinate, flag and severity fields of a stop row.
pub fn normalize(raw: SituationStopRecord) -> NormalizedStop {
    NormalizedStop {
        start_time: raw.start_time.as_deref().and_then(parse_timestamp),
        end_time: raw.end_time.as_deref().and_then(parse_timestamp),
        planned: raw.planned.as_deref().and_then(parse_planned),
        severity: parse_severity(raw.severity.as_deref()),
        latitude: raw.latitude.as_deref().and_then(parse_float),
        longitude: raw.longitude.as_deref().and_then(parse_float),
        situation_id: raw.situation_id,
        operator_code: raw.operator_code,
        summary: raw.summary,
        description: raw.description,
        stop_name: raw.stop_name,
    }
}

/// Number of stop rows with an undefined value, per column.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MissingValues {
    pub rows: usize,
    pub situation_id: usize,
    pub operator: usize,
    pub summary: usize,
    pub description: usize,
    pub start_time: usize,
    pub end_time: usize,
    pub planned: usize,
    pub severity: usize,
    pub stop_name: usize,
    pub latitude: usize,
    pub longitude: usize,
}

impl MissingValues {
    pub fn tally(stops: &[NormalizedStop]) -> Self {
        let mut m = MissingValues {
            rows: stops.len(),
            ..Default::default()
        };

        for stop in stops {
            m.situation_id += stop.situation_id.is_none() as usize;
            m.operator += stop.operator_code.is_none() as usize;
            m.summary += stop.summary.is_none() as usize;
            m.description += stop.description.is_empty() as usize;
            m.start_time += stop.start_time.is_none() as usize;
            m.end_time += stop.end_time.is_none() as usize;
            m.planned += stop.planned.is_none() as usize;
            m.severity += (stop.severity == Severity::Unknown) as usize;
            m.stop_name += stop.stop_name.is_none() as usize;
            m.latitude += stop.latitude.is_none() as usize;
            m.longitude += stop.longitude.is_none() as usize;
        }

        m
    }
}
