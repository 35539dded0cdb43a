//! Custom integration command handlers

use anyhow::{Context as _, Result, bail};
use clap::Args;
use codestream_core::domain::custom_integration::CustomIntegration;
use codestream_core::query::ResourceQuery;
use colored::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::deleted_message;
use crate::config::Context;
use crate::output::{custom_integration_table, render_results};
use crate::session;

#[derive(Args)]
pub struct GetCustomIntegrationArgs {
    /// ID of the custom integration to list
    #[arg(short, long)]
    pub id: Option<String>,

    /// Name of the custom integration to list
    #[arg(short, long)]
    pub name: Option<String>,

    /// List custom integrations in project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Return JSON formatted custom integration(s)
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CreateCustomIntegrationArgs {
    /// YAML file holding one custom integration or a list of them
    #[arg(long = "importPath")]
    pub import_path: PathBuf,
}

#[derive(Args)]
pub struct UpdateCustomIntegrationArgs {
    /// ID of the custom integration to update
    #[arg(short, long)]
    pub id: String,

    /// YAML file holding the new definition
    #[arg(long = "importPath")]
    pub import_path: PathBuf,
}

#[derive(Args)]
pub struct DeleteCustomIntegrationArgs {
    /// ID of the custom integration to delete
    #[arg(short, long)]
    pub id: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegrationFile {
    Many(Vec<CustomIntegration>),
    One(Box<CustomIntegration>),
}

fn parse_integrations(contents: &str) -> Result<Vec<CustomIntegration>> {
    let integrations = match serde_yaml::from_str(contents)? {
        IntegrationFile::Many(list) => list,
        IntegrationFile::One(single) => vec![*single],
    };

    for integration in &integrations {
        if integration.name.trim().is_empty() {
            bail!("Custom integration definition is missing a name");
        }
    }
    Ok(integrations)
}

fn read_integrations(path: &Path) -> Result<Vec<CustomIntegration>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_integrations(&contents)
        .with_context(|| format!("Invalid custom integration file: {}", path.display()))
}

/// List custom integrations
pub async fn get(args: GetCustomIntegrationArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    let query = ResourceQuery {
        id: args.id,
        name: args.name,
        project: args.project,
        ..Default::default()
    };
    let integrations = client
        .get_custom_integrations(&query)
        .await
        .context("Unable to get Code Stream Custom Integrations")?;

    match render_results(&integrations, args.json, true, custom_integration_table)? {
        Some(out) => println!("{}", out),
        None => warn!("No results found"),
    }

    Ok(())
}

/// Register custom integrations from YAML
pub async fn create(args: CreateCustomIntegrationArgs, ctx: &mut Context) -> Result<()> {
    let integrations = read_integrations(&args.import_path)?;
    let client = session::connect(ctx).await?;

    for integration in &integrations {
        debug!(name = %integration.name, "creating custom integration");
        let created = client
            .create_custom_integration(integration)
            .await
            .with_context(|| format!("Unable to create custom integration {}", integration.name))?;

        println!(
            "{}",
            format!(
                "✓ Custom integration {} created with id {}",
                created.name, created.id
            )
            .green()
            .bold()
        );
    }

    Ok(())
}

/// Replace a custom integration from YAML
pub async fn update(args: UpdateCustomIntegrationArgs, ctx: &mut Context) -> Result<()> {
    let mut integrations = read_integrations(&args.import_path)?;
    if integrations.len() != 1 {
        bail!(
            "{} must hold exactly one custom integration to update, found {}",
            args.import_path.display(),
            integrations.len()
        );
    }
    let mut integration = integrations.remove(0);
    integration.id = args.id.clone();

    let client = session::connect(ctx).await?;
    let updated = client
        .update_custom_integration(&args.id, &integration)
        .await
        .context("Unable to update custom integration")?;

    println!(
        "{}",
        format!("✓ Custom integration {} updated", updated.name)
            .green()
            .bold()
    );

    Ok(())
}

/// Delete a custom integration
pub async fn delete(args: DeleteCustomIntegrationArgs, ctx: &mut Context) -> Result<()> {
    let client = session::connect(ctx).await?;

    let deleted = client
        .delete_custom_integration(&args.id)
        .await
        .context("Unable to delete custom integration")?;

    println!(
        "{}",
        deleted_message("Custom integration", &deleted.id, &args.id).green().bold()
    );

    Ok(())
}
