//! Keyword-based disruption cause classification.
//!
//! Classification runs in three passes over the whole dataset:
//!
//! 1. every record's description is matched against the [`CategoryTable`];
//! 2. records still in `Others` are matched again using their summary;
//! 3. the detailed category is folded into a broad one with [`BroadFold`].

pub mod broad;
pub mod categories;

pub use broad::{BroadFold, BroadGroup};
pub use categories::{CategoryRule, CategoryTable};

use tracing::{debug, instrument};

use crate::model::{OTHERS, SituationRecord};

/// Runs `classify` for a single text against `table`.
pub fn classify<'t>(text: &str, table: &'t CategoryTable) -> &'t str {
    table.classify(text)
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    detailed: CategoryTable,
    broad: BroadFold,
}

impl Classifier {
    pub fn new(detailed: CategoryTable, broad: BroadFold) -> Self {
        Self { detailed, broad }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.detailed
    }

    pub fn fold(&self) -> &BroadFold {
        &self.broad
    }

    /// Assigns detailed and broad categories to every record in place.
    #[instrument(
        name = "classify",
        skip_all,
        fields(records = records.len(), by_summary = tracing::field::Empty, others = tracing::field::Empty)
    )]
    pub fn classify_all(&self, records: &mut [SituationRecord]) {
        for record in records.iter_mut() {
            record.detailed_category = classify(&record.description, &self.detailed).to_string();
        }

        let mut by_summary = 0usize;
        for record in records
            .iter_mut()
            .filter(|r| r.detailed_category == OTHERS)
        {
            let summary = record.summary.as_deref().unwrap_or_default();
            let category = classify(summary, &self.detailed);
            if category != OTHERS {
                by_summary += 1;
                debug!(situation = ?record.situation_id, category, "Classified by summary");
            }
            record.detailed_category = category.to_string();
        }

        for record in records.iter_mut() {
            record.broad_category = self.broad.fold(&record.detailed_category).to_string();
        }

        let others = records
            .iter()
            .filter(|r| r.detailed_category == OTHERS)
            .count();
        let span = tracing::Span::current();
        span.record("by_summary", by_summary);
        span.record("others", others);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn record(summary: Option<&str>, description: &str) -> SituationRecord {
        SituationRecord {
            situation_id: Some("S1".into()),
            operator_code: None,
            summary: summary.map(str::to_string),
            description: description.to_string(),
            start_time: None,
            end_time: None,
            stop_names: vec![],
            latitude: None,
            longitude: None,
            planned: None,
            severity: Severity::Unknown,
            is_end_time_unknown: true,
            duration_hours: None,
            detailed_category: OTHERS.into(),
            broad_category: OTHERS.into(),
        }
    }

    #[test]
    fn test_description_match_takes_precedence() {
        let mut records = vec![record(Some("Bridge repairs"), "Road closed near the park")];
        Classifier::default().classify_all(&mut records);
        assert_eq!(records[0].detailed_category, "Road Closure");
        assert_eq!(records[0].broad_category, "Road Closure");
    }

    #[test]
    fn test_summary_fallback() {
        let mut records = vec![record(Some("Bridge inspection"), "Details to follow")];
        Classifier::default().classify_all(&mut records);
        assert_eq!(records[0].detailed_category, "Bridge Issue");
        assert_eq!(records[0].broad_category, "Incidents");
    }

    #[test]
    fn test_fallback_may_stay_others() {
        let mut records = vec![record(None, ""), record(Some("Notice"), "Details to follow")];
        Classifier::default().classify_all(&mut records);
        for r in &records {
            assert_eq!(r.detailed_category, "Others");
            assert_eq!(r.broad_category, "Others");
        }
    }

    #[test]
    fn test_staff_shortage_has_no_broad_group() {
        let mut records = vec![record(None, "Due to staff sickness")];
        Classifier::default().classify_all(&mut records);
        assert_eq!(records[0].detailed_category, "Staff Shortage");
        assert_eq!(records[0].broad_category, "Others");
    }

    #[test]
    fn test_classify_free_function() {
        let table = CategoryTable::default();
        assert_eq!(classify("Bus station closed", &table), "Bus Stop Closure");
    }
}
