//! Output formatting
//!
//! Tables for result lists, pretty JSON for single results and `--json`.

use anyhow::{Context, Result};
use codestream_core::domain::custom_integration::CustomIntegration;
use codestream_core::domain::execution::Execution;
use codestream_core::domain::pipeline::Pipeline;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::ConfigFile;

#[derive(Tabled)]
struct PipelineRow<'a> {
    #[tabled(rename = "Id")]
    id: &'a str,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Project")]
    project: &'a str,
    #[tabled(rename = "Description")]
    description: &'a str,
    #[tabled(rename = "State")]
    state: String,
}

#[derive(Tabled)]
struct ExecutionRow<'a> {
    #[tabled(rename = "Id")]
    id: &'a str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Project")]
    project: &'a str,
    #[tabled(rename = "Status")]
    status: &'a str,
    #[tabled(rename = "Requested")]
    requested: String,
}

#[derive(Tabled)]
struct CustomIntegrationRow<'a> {
    #[tabled(rename = "Id")]
    id: &'a str,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Project")]
    project: &'a str,
    #[tabled(rename = "Status")]
    status: &'a str,
    #[tabled(rename = "Description")]
    description: &'a str,
}

#[derive(Tabled)]
struct TargetRow<'a> {
    #[tabled(rename = "")]
    current: &'static str,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Server")]
    server: &'a str,
    #[tabled(rename = "Username")]
    username: &'a str,
    #[tabled(rename = "Domain")]
    domain: &'a str,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::modern()).to_string()
}

pub fn pipeline_table(pipelines: &[Pipeline]) -> String {
    render(
        pipelines
            .iter()
            .map(|p| PipelineRow {
                id: &p.id,
                name: &p.name,
                project: &p.project,
                description: p.description.as_deref().unwrap_or_default(),
                state: p.state.map(|s| s.to_string()).unwrap_or_default(),
            })
            .collect(),
    )
}

/// Executions are listed as `name#index`, the way the service UI shows them
pub fn execution_table(executions: &[Execution]) -> String {
    render(
        executions
            .iter()
            .map(|e| ExecutionRow {
                id: &e.id,
                name: format!("{}#{}", e.name, e.index),
                project: &e.project,
                status: &e.status,
                requested: e
                    .requested_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default(),
            })
            .collect(),
    )
}

pub fn custom_integration_table(integrations: &[CustomIntegration]) -> String {
    render(
        integrations
            .iter()
            .map(|c| CustomIntegrationRow {
                id: &c.id,
                name: &c.name,
                project: &c.project,
                status: c.status.as_deref().unwrap_or_default(),
                description: c.description.as_deref().unwrap_or_default(),
            })
            .collect(),
    )
}

/// Targets in the config file, the active one marked with `*`
pub fn target_table(config: &ConfigFile) -> String {
    let current = config.current_target_name.as_deref();
    render(
        config
            .target
            .iter()
            .map(|(name, target)| TargetRow {
                current: if current == Some(name.as_str()) { "*" } else { "" },
                name,
                server: target.server.as_deref().unwrap_or_default(),
                username: target.username.as_deref().unwrap_or_default(),
                domain: target.domain.as_deref().unwrap_or_default(),
            })
            .collect(),
    )
}

pub fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to format result as JSON")
}

/// Render a result list for stdout
///
/// `None` when there is nothing to show. With `json`, or a lone result when
/// `single_as_json` is set, each item is pretty JSON; otherwise a table.
pub fn render_results<T: Serialize>(
    items: &[T],
    json: bool,
    single_as_json: bool,
    table: impl Fn(&[T]) -> String,
) -> Result<Option<String>> {
    let as_json = json || (single_as_json && items.len() == 1);
    match items {
        [] => Ok(None),
        _ if as_json => {
            let rendered = items.iter().map(pretty).collect::<Result<Vec<_>>>()?;
            Ok(Some(rendered.join("\n")))
        }
        _ => Ok(Some(table(items))),
    }
}
