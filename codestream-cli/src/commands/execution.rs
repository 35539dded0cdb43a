//! Execution command handlers

use anyhow::{Context as _, Result, anyhow};
use clap::Args;
use codestream_core::dto::execution::CreateExecution;
use codestream_core::query::ResourceQuery;
use colored::*;
use serde_json::Value;
use tracing::warn;

use super::deleted_message;
use crate::config::Context;
use crate::output::{execution_table, render_results};
use crate::session;

#[derive(Args)]
pub struct GetExecutionArgs {
    /// ID of the execution to list
    #[arg(short, long)]
    pub id: Option<String>,

    /// Name of the pipeline to list executions for
    #[arg(short, long)]
    pub name: Option<String>,

    /// Filter executions by status (e.g. Completed, Failed, Running)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter executions by project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Only nested executions
    #[arg(long)]
    pub nested: bool,

    /// Return JSON formatted execution(s)
    #[arg(long)]
    pub json: bool,
}

impl GetExecutionArgs {
    fn query(&self) -> ResourceQuery {
        ResourceQuery {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status.clone(),
            project: self.project.clone(),
            nested: self.nested,
        }
    }
}

#[derive(Args)]
pub struct CreateExecutionArgs {
    /// ID of the pipeline to run
    #[arg(short, long)]
    pub id: String,

    /// Inputs as a JSON object, e.g. '{"branch": "main"}'
    #[arg(long, default_value = "{}", value_parser = parse_inputs)]
    pub inputs: Value,

    /// Comment stored with the execution
    #[arg(long, default_value = "")]
    pub comments: String,
}

#[derive(Args)]
pub struct DeleteExecutionArgs {
    /// ID of the execution to delete
    #[arg(short, long)]
    pub id: String,
}

/// Parse `--inputs` as a JSON object
fn parse_inputs(s: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(s).map_err(|e| anyhow!("--inputs is not valid JSON: {}", e))?;
    if !value.is_object() {
        return Err(anyhow!("--inputs must be a JSON object"));
    }
    Ok(value)
}

/// List executions, newest first
pub async fn get(args: GetExecutionArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    let executions = client
        .get_executions(&args.query())
        .await
        .context("Unable to get executions")?;

    match render_results(&executions, args.json, true, execution_table)? {
        Some(out) => println!("{}", out),
        None => warn!("No results found"),
    }

    Ok(())
}

/// Run a pipeline
pub async fn create(args: CreateExecutionArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    let req = CreateExecution {
        comments: args.comments,
        input: args.inputs,
    };
    let created = client
        .create_execution(&args.id, &req)
        .await
        .context("Unable to create execution")?;

    println!("{}", "✓ Execution created successfully!".green().bold());
    println!("  Execution ID: {}", created.execution_id.cyan());
    println!("  Pipeline:     {}", created.name.bold());
    println!("  Link:         {}", created.execution_link.dimmed());

    Ok(())
}

/// Delete an execution
pub async fn delete(args: DeleteExecutionArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    let deleted = client
        .delete_execution(&args.id)
        .await
        .context("Unable to delete execution")?;

    println!(
        "{}",
        deleted_message("Execution", &deleted.id, &args.id).green().bold()
    );

    Ok(())
}
