//! Execution domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::null_as_default;

/// One run of a pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Execution {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project: String,
    pub index: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub status_message: Option<String>,
    pub comments: Option<String>,
    pub input: Value,
    pub output: Value,
    #[serde(rename = "_nested")]
    pub nested: bool,
    #[serde(rename = "_link")]
    pub link: Option<String>,
    #[serde(rename = "_requestTimeInMicros")]
    pub request_time_in_micros: i64,
}

impl Execution {
    /// When the execution was requested, if the service reported it
    pub fn requested_at(&self) -> Option<DateTime<Utc>> {
        if self.request_time_in_micros <= 0 {
            return None;
        }
        DateTime::from_timestamp_micros(self.request_time_in_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_meta_fields() {
        let json = r#"{
            "id": "9cc5aedc-db48-4c02-a5e4-086de3160dc0",
            "name": "vra-authenticateUser",
            "project": "Field Demo",
            "index": 12,
            "status": "COMPLETED",
            "statusMessage": "Execution Completed.",
            "input": {"vraFQDN": "vra8.example.com"},
            "output": {"token": "abc"},
            "_nested": true,
            "_link": "/pipeline/api/executions/9cc5aedc-db48-4c02-a5e4-086de3160dc0",
            "_requestTimeInMicros": 1611238472000000
        }"#;

        let execution: Execution = serde_json::from_str(json).unwrap();
        assert_eq!(execution.index, 12);
        assert_eq!(execution.status, "COMPLETED");
        assert!(execution.nested);
        assert_eq!(
            execution.requested_at().unwrap().to_rfc3339(),
            "2021-01-21T14:14:32+00:00"
        );
    }

    #[test]
    fn test_missing_request_time() {
        let execution: Execution = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(execution.requested_at().is_none());
        assert!(!execution.nested);
    }
}
