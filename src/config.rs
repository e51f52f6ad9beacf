use anyhow::{Context, Result};
use serde::Deserialize;

use crate::classify::{BroadFold, BroadGroup, CategoryRule, CategoryTable, Classifier};

/// Optional classifier overrides, stored as JSON:
///
/// ```json
/// {
///   "detailed": [{ "label": "Flooding", "keywords": ["flood"] }],
///   "broad": [{ "label": "Weather", "members": ["Flooding"] }]
/// }
/// ```
///
/// A missing section falls back to the built-in table. Rule order in the
/// file is the matching order.
#[derive(Debug, Default, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub detailed: Option<Vec<CategoryRule>>,
    #[serde(default)]
    pub broad: Option<Vec<BroadGroup>>,
}

impl ClassifierConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read classifier config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("Invalid classifier config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn into_classifier(self) -> Classifier {
        let detailed = self
            .detailed
            .map(CategoryTable::new)
            .unwrap_or_default();
        let broad = self.broad.map(BroadFold::new).unwrap_or_default();
        Classifier::new(detailed, broad)
    }
}

/// Builds the classifier from `path`, or the built-in tables without one.
pub fn load_classifier(path: Option<&str>) -> Result<Classifier> {
    match path {
        Some(path) => Ok(ClassifierConfig::load(path)?.into_classifier()),
        None => Ok(Classifier::default()),
    }
}
