//! Service error envelope

use serde::{Deserialize, Serialize};

use crate::domain::null_as_default;

/// Error body returned by the service on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceError {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub error_code: Option<i64>,
    pub status_code: Option<u16>,
    #[serde(deserialize_with = "null_as_default")]
    pub details: Vec<String>,
}

impl ServiceError {
    /// Best message for a failed response body
    ///
    /// Prefers the envelope's `message`, then the raw body, then `fallback`
    /// (usually the HTTP reason phrase). Never returns an empty string.
    pub fn describe(body: &str, fallback: &str) -> String {
        if let Ok(envelope) = serde_json::from_str::<ServiceError>(body) {
            let message = envelope.message.trim();
            if !message.is_empty() {
                return message.to_string();
            }
        }

        let body = body.trim();
        if !body.is_empty() {
            return body.to_string();
        }

        if fallback.trim().is_empty() {
            "unknown error".to_string()
        } else {
            fallback.to_string()
        }
    }
}
