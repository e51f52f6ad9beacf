//! End-to-end batch transform: document → classified situations.

use tracing::{info, instrument};

use crate::aggregate::aggregate;
use crate::classify::Classifier;
use crate::error::PipelineError;
use crate::model::SituationRecord;
use crate::normalize::{MissingValues, normalize};
use crate::parser::parse_situations;

/// Parses, normalizes, aggregates and classifies a SIRI-SX document.
///
/// # Errors
///
/// Only a document that cannot be parsed is an error. Every other anomaly
/// ends up as an undefined field or an `Others` category.
#[instrument(name = "process_document", skip_all, fields(bytes = bytes.len()))]
pub fn process_document(
    bytes: &[u8],
    classifier: &Classifier,
) -> Result<Vec<SituationRecord>, PipelineError> {
    let raw = parse_situations(bytes)?;
    let stops: Vec<_> = raw.into_iter().map(normalize).collect();

    let missing = MissingValues::tally(&stops);
    info!(
        rows = missing.rows,
        situation_id = missing.situation_id,
        operator = missing.operator,
        summary = missing.summary,
        description = missing.description,
        start_time = missing.start_time,
        end_time = missing.end_time,
        planned = missing.planned,
        severity = missing.severity,
        stop_name = missing.stop_name,
        latitude = missing.latitude,
        longitude = missing.longitude,
        "Missing values per column"
    );

    let mut records = aggregate(stops);
    classifier.classify_all(&mut records);

    info!(situations = records.len(), "Situations classified");
    Ok(records)
}
