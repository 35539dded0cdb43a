//! Custom integration domain types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::null_as_default;

/// A user-defined action or credential registered with the service
///
/// The same shape is used for create/update bodies; `id` is omitted from
/// the payload when empty so the service assigns one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomIntegration {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_integration_payload_omits_id() {
        let integration = CustomIntegration {
            name: "notify-slack".to_string(),
            project: "production".to_string(),
            kind: Some("REGULAR".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&integration).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("value").is_none());
        assert_eq!(json["type"], "REGULAR");
    }
}
