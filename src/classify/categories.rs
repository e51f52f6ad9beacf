use serde::{Deserialize, Serialize};

use crate::model::OTHERS;

/// Detailed categories and their keywords, in matching order.
static DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Service Withdrawal", &["withdrawal"]),
    (
        "Bus Stop Closure",
        &[
            "stop closure",
            "bus stop closure",
            "stop closed",
            "bus stop suspension",
            "bus station",
        ],
    ),
    (
        "Road Closure",
        &[
            "road closure",
            "road will be closed",
            "lane is closed",
            "road closed",
            "drive will be closed",
            "road east will be closed",
            "lane will be closed",
            "street in leeds city centre closed",
        ],
    ),
    ("Service Diversion", &["diversion", "service", "divert"]),
    (
        "Roadworks",
        &[
            "roadworks",
            "road works",
            "line works",
            "road conditions",
            "surface dressing",
            "installation",
        ],
    ),
    ("Emergency Closure", &["emergency"]),
    ("Special Events", &["event", "march"]),
    (
        "Maintenance/Repair",
        &[
            "maintenance",
            "repair",
            "replacement",
            "upgrade",
            "water",
            "resurfacing",
            "renewal",
            "junction",
            "gas works",
            "waterpipe",
        ],
    ),
    ("Construction/Demolition", &["construction", "demolition"]),
    ("Incident", &["incident"]),
    ("Security Issue", &["police", "security", "safety"]),
    ("Staff Shortage", &["staff", "shortage"]),
    ("Bridge Issue", &["bridge"]),
    ("Traffic", &["traffic"]),
    ("Tram Works/Disruption", &["tram"]),
    ("Service Change", &["service change"]),
];

/// A detailed category and the substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub label: String,
    pub keywords: Vec<String>,
}

/// Ordered keyword table. The first rule with any matching keyword wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    /// Builds a table from `rules`, keeping their order.
    ///
    /// Keywords are lower-cased and empty keywords are dropped, since an
    /// empty needle would match every text.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                label: rule.label,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Returns the first category whose keywords occur in `text`
    /// (case-insensitive), or `Others`.
    pub fn classify(&self, text: &str) -> &str {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|rule| rule.label.as_str())
            .unwrap_or(OTHERS)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_CATEGORIES
                .iter()
                .map(|(label, keywords)| CategoryRule {
                    label: label.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        )
    }
}
