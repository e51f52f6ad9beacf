use chrono::{DateTime, Timelike, Utc};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::HashMap;

use crate::model::{SituationRecord, UNKNOWN};
use crate::utility::mean;

const HOTSPOT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub latitude: f64,
    pub longitude: f64,
    pub situations: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct DatasetSummary {
    pub timestamp: DateTime<Utc>,
    pub situations: usize,
    pub unknown_end_time: usize,
    pub mean_duration_hours: Option<f64>,

    // distributions, most frequent first
    pub detailed_categories: Vec<LabelCount>,
    pub broad_categories: Vec<LabelCount>,
    pub severities: Vec<LabelCount>,
    pub planned: Vec<LabelCount>,

    pub by_start_hour: [usize; 24],
    pub hotspots: Vec<Hotspot>,
}

/// Counts labels, most frequent first. Ties keep first-appearance order.
pub fn value_counts<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<LabelCount> = Vec::new();

    for label in labels {
        match index.get(label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label, counts.len());
                counts.push(LabelCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

impl DatasetSummary {
    pub fn from_records(records: &[SituationRecord]) -> Self {
        let mut by_start_hour = [0usize; 24];
        for hour in records.iter().filter_map(|r| r.start_time.map(|t| t.hour())) {
            by_start_hour[hour as usize] += 1;
        }

        DatasetSummary {
            timestamp: Utc::now(),
            situations: records.len(),
            unknown_end_time: records.iter().filter(|r| r.is_end_time_unknown).count(),
            mean_duration_hours: mean(records.iter().map(|r| r.duration_hours)),
            detailed_categories: value_counts(records.iter().map(|r| r.detailed_category.as_str())),
            broad_categories: value_counts(records.iter().map(|r| r.broad_category.as_str())),
            severities: value_counts(records.iter().map(|r| r.severity.label())),
            planned: value_counts(records.iter().map(|r| match r.planned {
                Some(true) => "true",
                Some(false) => "false",
                None => UNKNOWN,
            })),
            by_start_hour,
            hotspots: hotspots(records, HOTSPOT_LIMIT),
        }
    }

    pub fn count_of(counts: &[LabelCount], label: &str) -> usize {
        counts
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Most frequent mean locations, skipping situations without coordinates.
pub fn hotspots(records: &[SituationRecord], limit: usize) -> Vec<Hotspot> {
    let mut index: HashMap<(OrderedFloat<f64>, OrderedFloat<f64>), usize> = HashMap::new();
    let mut spots: Vec<Hotspot> = Vec::new();

    for record in records {
        let (Some(latitude), Some(longitude)) = (record.latitude, record.longitude) else {
            continue;
        };
        let key = (OrderedFloat(latitude), OrderedFloat(longitude));
        match index.get(&key) {
            Some(&i) => spots[i].situations += 1,
            None => {
                index.insert(key, spots.len());
                spots.push(Hotspot {
                    latitude,
                    longitude,
                    situations: 1,
                });
            }
        }
    }

    spots.sort_by(|a, b| b.situations.cmp(&a.situations));
    spots.truncate(limit);
    spots
}
