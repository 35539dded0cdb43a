//! Pipeline domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::null_as_default;
use crate::error::Error;

/// Pipeline definition as returned by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pipeline {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project: String,
    pub description: Option<String>,
    pub state: Option<PipelineState>,
    pub enabled: bool,
    pub concurrency: Option<i64>,
    /// Input form: input name to default value
    #[serde(deserialize_with = "null_as_default")]
    pub input: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub output: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(rename = "_link")]
    pub link: Option<String>,
}

/// Lifecycle state of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Enabled,
    Disabled,
    Released,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Enabled => "ENABLED",
            PipelineState::Disabled => "DISABLED",
            PipelineState::Released => "RELEASED",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineState {
    type Err = Error;

    /// Case-insensitive parse of ENABLED, DISABLED or RELEASED
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENABLED" => Ok(PipelineState::Enabled),
            "DISABLED" => Ok(PipelineState::Disabled),
            "RELEASED" => Ok(PipelineState::Released),
            _ => Err(Error::InvalidState(s.to_string())),
        }
    }
}
