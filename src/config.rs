use anyhow::Result;
use serde::Deserialize;

/// Field names used to read labeled record sets from JSON input.
///
/// Stored as a plain JSON object on disk; every key is optional:
/// ```json
/// {
///   "label_field": "key",
///   "records_field": "data",
///   "stop_number_field": "stopNbr"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub label_field: String,
    pub records_field: String,
    pub stop_number_field: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            label_field: "key".to_string(),
            records_field: "data".to_string(),
            stop_number_field: "stopNumber".to_string(),
        }
    }
}

impl GroupingConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: GroupingConfig = serde_json::from_str(content)?;
        if config.label_field == config.records_field {
            anyhow::bail!(
                "label_field and records_field must differ (both \"{}\")",
                config.label_field
            );
        }
        Ok(config)
    }
}
