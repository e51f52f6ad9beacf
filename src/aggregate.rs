//! Consolidation of stop rows into one record per situation.

use std::collections::HashMap;

use tracing::instrument;

use crate::model::{NormalizedStop, OTHERS, SituationRecord, Timestamp, UNKNOWN};
use crate::utility::mean;

struct Group {
    first: NormalizedStop,
    stop_names: Vec<String>,
    latitudes: Vec<Option<f64>>,
    longitudes: Vec<Option<f64>>,
}

impl Group {
    fn new(first: NormalizedStop) -> Self {
        let mut group = Group {
            stop_names: Vec::new(),
            latitudes: Vec::new(),
            longitudes: Vec::new(),
            first,
        };
        let (name, lat, lon) = (
            group.first.stop_name.clone(),
            group.first.latitude,
            group.first.longitude,
        );
        group.add_stop(name, lat, lon);
        group
    }

    fn add_stop(&mut self, name: Option<String>, lat: Option<f64>, lon: Option<f64>) {
        let name = name.unwrap_or_else(|| UNKNOWN.to_string());
        if !self.stop_names.contains(&name) {
            self.stop_names.push(name);
        }
        self.latitudes.push(lat);
        self.longitudes.push(lon);
    }

    fn finish(self) -> SituationRecord {
        let first = self.first;
        let is_end_time_unknown = first.end_time.is_none();
        let duration_hours = if is_end_time_unknown {
            None
        } else {
            duration_hours(first.start_time, first.end_time)
        };

        SituationRecord {
            situation_id: first.situation_id,
            operator_code: first.operator_code,
            summary: first.summary,
            description: first.description,
            start_time: first.start_time,
            end_time: first.end_time,
            stop_names: self.stop_names,
            latitude: mean(self.latitudes),
            longitude: mean(self.longitudes),
            planned: first.planned,
            severity: first.severity,
            is_end_time_unknown,
            duration_hours,
            detailed_category: OTHERS.to_string(),
            broad_category: OTHERS.to_string(),
        }
    }
}

/// Hours between `start` and `end`, when both are known.
pub fn duration_hours(start: Option<Timestamp>, end: Option<Timestamp>) -> Option<f64> {
    let (start, end) = (start?, end?);
    Some((end - start).num_milliseconds() as f64 / 3_600_000.0)
}

/// Groups stop rows by situation number, keeping first-seen order.
///
/// Situation-level fields come from the first row of each situation. Stop
/// names are de-duplicated in order of appearance and coordinates are
/// averaged over the rows that have them. Classification fields start out
/// as `Others`.
#[instrument(name = "aggregate", skip_all, fields(situations = tracing::field::Empty))]
pub fn aggregate(stops: Vec<NormalizedStop>) -> Vec<SituationRecord> {
    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for stop in stops {
        match index.get(&stop.situation_id) {
            Some(&i) => groups[i].add_stop(stop.stop_name, stop.latitude, stop.longitude),
            None => {
                index.insert(stop.situation_id.clone(), groups.len());
                groups.push(Group::new(stop));
            }
        }
    }

    tracing::Span::current().record("situations", groups.len());
    groups.into_iter().map(Group::finish).collect()
}
