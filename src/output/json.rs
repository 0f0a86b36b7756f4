//! JSON output formatting

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    /// The actual data
    pub data: T,

    /// Metadata about the response
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// Timestamp of the response
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Number of records when `data` is a list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> JsonOutput<T> {
    /// Create a new JSON output with metadata
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                count: None,
            },
        }
    }
}

/// Format a list as pretty-printed JSON
pub fn format_json<T: Serialize>(data: &[T]) -> Result<String, serde_json::Error> {
    let mut output = JsonOutput::new(data);
    output.meta.count = Some(data.len());
    serde_json::to_string_pretty(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Clone)]
    struct OrgRow {
        id: String,
        name: String,
    }

    #[test]
    fn test_json_output_new() {
        let output = JsonOutput::new(vec!["branch_a", "branch_a_N2"]);

        assert_eq!(output.data, vec!["branch_a", "branch_a_N2"]);
        assert_eq!(output.meta.version, env!("CARGO_PKG_VERSION"));
        assert!(!output.meta.timestamp.is_empty());
        assert!(output.meta.count.is_none());
    }

    #[test]
    fn test_format_json_envelope() {
        let rows = vec![OrgRow {
            id: "549236".to_string(),
            name: "Acme HQ".to_string(),
        }];

        let result = format_json(&rows).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(parsed["data"][0]["name"], "Acme HQ");
        assert_eq!(parsed["meta"]["count"], 1);
        assert!(parsed["meta"]["timestamp"].is_string());
        assert_eq!(parsed["meta"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_format_json_empty_list() {
        let rows: Vec<OrgRow> = vec![];
        let result = format_json(&rows).unwrap();

        assert!(result.contains("\"data\": []"));
        assert!(result.contains("\"count\": 0"));
    }
}
