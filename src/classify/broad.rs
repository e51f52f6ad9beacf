use serde::{Deserialize, Serialize};

use crate::model::OTHERS;

static DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    ("Bus Stop Closure", &["Bus Stop Closure"]),
    ("Road Closure", &["Road Closure"]),
    (
        "Infrastructure Work",
        &[
            "Maintenance/Repair",
            "Roadworks",
            "Construction/Demolition",
            "Tram Works/Disruption",
        ],
    ),
    (
        "Service Changes",
        &["Service Diversion", "Service Withdrawal", "Service Change"],
    ),
    (
        "Events and Emergency Circumstances",
        &["Special Events", "Emergency Closure", "Security Issue"],
    ),
    ("Incidents", &["Incident", "Traffic", "Bridge Issue"]),
];

/// A broad category and the detailed categories folded into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadGroup {
    pub label: String,
    pub members: Vec<String>,
}

/// Many-to-one mapping from detailed to broad categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadFold {
    groups: Vec<BroadGroup>,
}

impl BroadFold {
    pub fn new(groups: Vec<BroadGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[BroadGroup] {
        &self.groups
    }

    /// Broad category of `detailed`; anything not listed folds to `Others`.
    pub fn fold(&self, detailed: &str) -> &str {
        self.groups
            .iter()
            .find(|group| group.members.iter().any(|m| m == detailed))
            .map(|group| group.label.as_str())
            .unwrap_or(OTHERS)
    }
}

impl Default for BroadFold {
    fn default() -> Self {
        Self::new(
            DEFAULT_GROUPS
                .iter()
                .map(|(label, members)| BroadGroup {
                    label: label.to_string(),
                    members: members.iter().map(|m| m.to_string()).collect(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_defaults() {
        let fold = BroadFold::default();
        assert_eq!(fold.fold("Bus Stop Closure"), "Bus Stop Closure");
        assert_eq!(fold.fold("Road Closure"), "Road Closure");
        assert_eq!(fold.fold("Tram Works/Disruption"), "Infrastructure Work");
        assert_eq!(fold.fold("Roadworks"), "Infrastructure Work");
        assert_eq!(fold.fold("Service Withdrawal"), "Service Changes");
        assert_eq!(fold.fold("Security Issue"), "Events and Emergency Circumstances");
        assert_eq!(fold.fold("Bridge Issue"), "Incidents");
    }

    #[test]
    fn test_unlisted_categories_fold_to_others() {
        let fold = BroadFold::default();
        assert_eq!(fold.fold("Staff Shortage"), "Others");
        assert_eq!(fold.fold("Others"), "Others");
        assert_eq!(fold.fold("road closure"), "Others");
        assert_eq!(fold.fold(""), "Others");
    }

    #[test]
    fn test_fold_of_fold_is_stable_for_others() {
        let fold = BroadFold::default();
        for detailed in ["Staff Shortage", "Others", "Whatever"] {
            let once = fold.fold(detailed);
            assert_eq!(fold.fold(once), "Others");
        }
    }
}
