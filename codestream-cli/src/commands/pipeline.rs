//! Pipeline command handlers
//!
//! Handles listing (table, JSON, input forms, export), YAML create/apply,
//! state changes and deletion of pipelines.

use anyhow::{Context as _, Result};
use clap::{ArgGroup, Args};
use codestream_core::domain::pipeline::PipelineState;
use codestream_core::dto::pipeline::{ImportMode, PatchPipeline};
use codestream_core::query::ResourceQuery;
use colored::*;
use std::path::PathBuf;
use tracing::{info, warn};

use super::deleted_message;
use crate::config::Context;
use crate::import::{export_pipelines, import_path};
use crate::output::{pipeline_table, pretty, render_results};
use crate::session;

#[derive(Args)]
pub struct GetPipelineArgs {
    /// ID of the pipeline to list
    #[arg(short, long)]
    pub id: Option<String>,

    /// Name of the pipeline to list
    #[arg(short, long)]
    pub name: Option<String>,

    /// List pipelines in project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Return JSON formatted pipeline(s)
    #[arg(long)]
    pub json: bool,

    /// Return pipeline input form(s)
    #[arg(short, long)]
    pub form: bool,

    /// Export pipeline(s) as YAML
    #[arg(short, long)]
    pub export: bool,

    /// Directory to export to, relative or absolute (implies --export)
    #[arg(long = "exportPath")]
    pub export_path: Option<PathBuf>,
}

impl GetPipelineArgs {
    fn query(&self) -> ResourceQuery {
        ResourceQuery {
            id: self.id.clone(),
            name: self.name.clone(),
            project: self.project.clone(),
            ..Default::default()
        }
    }

    fn export_dir(&self) -> Option<PathBuf> {
        match (&self.export_path, self.export) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(PathBuf::from(".")),
            (None, false) => None,
        }
    }
}

#[derive(Args)]
pub struct CreatePipelineArgs {
    /// YAML file, or directory of YAML files, to import
    #[arg(long = "importPath")]
    pub import_path: PathBuf,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("change")
        .required(true)
        .multiple(true)
        .args(["state", "import_path"])
))]
pub struct UpdatePipelineArgs {
    /// ID of the pipeline to update
    #[arg(short, long)]
    pub id: Option<String>,

    /// Set the state of the pipeline (ENABLED|DISABLED|RELEASED)
    #[arg(short, long, requires = "id")]
    pub state: Option<PipelineState>,

    /// YAML file, or directory of YAML files, to apply
    #[arg(long = "importPath")]
    pub import_path: Option<PathBuf>,
}

#[derive(Args)]
pub struct DeletePipelineArgs {
    /// ID of the pipeline to delete
    #[arg(short, long)]
    pub id: String,
}

/// List pipelines
pub async fn get(args: GetPipelineArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    let pipelines = client
        .get_pipelines(&args.query())
        .await
        .context("Unable to get Code Stream Pipelines")?;

    if pipelines.is_empty() {
        warn!("No results found");
        return Ok(());
    }

    if let Some(dir) = args.export_dir() {
        for file in export_pipelines(&client, &pipelines, &dir).await? {
            println!("{} {}", "✓ Exported".green().bold(), file.display());
        }
    }

    if args.form && !args.json {
        for pipeline in &pipelines {
            println!("{}", pretty(&pipeline.input)?);
        }
    } else if let Some(out) = render_results(&pipelines, args.json, false, pipeline_table)? {
        println!("{}", out);
    }

    Ok(())
}

/// Create pipelines from YAML
pub async fn create(args: CreatePipelineArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    let imported = import_path(&client, &args.import_path, ImportMode::Create).await?;
    print_imported(&imported, "created");

    Ok(())
}

/// Change a pipeline's state and/or apply YAML definitions
pub async fn update(args: UpdatePipelineArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    if let Some(state) = args.state {
        let id = args.id.as_deref().context("--id is required with --state")?;
        let pipeline = client
            .patch_pipeline(id, &PatchPipeline::state(state))
            .await
            .context("Unable to update Code Stream Pipeline")?;

        info!("Setting pipeline {} to {}", pipeline.name, state);
        println!(
            "{}",
            format!("✓ Pipeline {} set to {}", pipeline.name, state)
                .green()
                .bold()
        );
    }

    if let Some(path) = &args.import_path {
        let imported = import_path(&client, path, ImportMode::Apply).await?;
        print_imported(&imported, "updated");
    }

    Ok(())
}

/// Delete a pipeline
pub async fn delete(args: DeletePipelineArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    let deleted = client
        .delete_pipeline(&args.id)
        .await
        .context("Delete Pipeline failed")?;

    println!(
        "{}",
        deleted_message("Pipeline", &deleted.id, &args.id).green().bold()
    );

    Ok(())
}

fn print_imported(files: &[PathBuf], action: &str) {
    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());
        println!(
            "{}",
            format!("✓ Imported {} successfully - Pipeline {}.", name, action)
                .green()
                .bold()
        );
    }
}
