//! Pipeline DTOs
//!
//! Partial-update bodies and the YAML document model used by import/apply.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value as YamlValue};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::pipeline::PipelineState;
use crate::error::{Error, Result};

/// Partial update of a pipeline
///
/// Only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchPipeline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PipelineState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl PatchPipeline {
    pub fn state(state: PipelineState) -> Self {
        Self {
            state: Some(state),
            ..Default::default()
        }
    }
}

/// Kind value every pipeline document carries
pub const PIPELINE_KIND: &str = "PIPELINE";

/// Pipeline definition as written in an exported/imported YAML file
///
/// Keys not modelled here are carried through untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDocument {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<YamlValue>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, YamlValue>,
}

impl PipelineDocument {
    /// Parse and validate a single pipeline document
    pub fn from_yaml(source: &str) -> Result<Self> {
        let document: PipelineDocument = serde_yaml::from_str(source)?;
        document.validate()?;
        Ok(document)
    }

    /// Render back to YAML for the import endpoint
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        if !self.kind.eq_ignore_ascii_case(PIPELINE_KIND) {
            return Err(Error::InvalidDocument(format!(
                "kind must be {}, found '{}'",
                PIPELINE_KIND, self.kind
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidDocument("name is required".to_string()));
        }
        if self.project.trim().is_empty() {
            return Err(Error::InvalidDocument(format!(
                "project is required for pipeline '{}'",
                self.name
            )));
        }
        Ok(())
    }
}

/// Whether an import creates new pipelines or updates existing ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    Create,
    Apply,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Create => "create",
            ImportMode::Apply => "apply",
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-document outcome reported by the import endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportResult {
    pub name: String,
    pub status: String,
    pub status_message: Option<String>,
    pub url: Option<String>,
}

impl ImportResult {
    /// The service reports failures as `*FAILED` or `ERROR` statuses
    pub fn is_success(&self) -> bool {
        let status = self.status.to_ascii_uppercase();
        !(status.ends_with("FAILED") || status == "ERROR")
    }
}
