//! Execution DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to trigger a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExecution {
    pub comments: String,
    pub input: Value,
}

/// Reply to a trigger request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateExecutionResponse {
    pub comments: Option<String>,
    pub execution_id: String,
    pub execution_link: String,
    pub input: Value,
    pub name: String,
    pub project: Option<String>,
}
