//! Commands module
//!
//! Defines the verb/resource command tree and routes each command to its
//! handler.

mod custom_integration;
mod execution;
mod pipeline;
mod target;

pub use custom_integration::{
    CreateCustomIntegrationArgs, DeleteCustomIntegrationArgs, GetCustomIntegrationArgs,
    UpdateCustomIntegrationArgs,
};
pub use execution::{CreateExecutionArgs, DeleteExecutionArgs, GetExecutionArgs};
pub use pipeline::{CreatePipelineArgs, DeletePipelineArgs, GetPipelineArgs, UpdatePipelineArgs};
pub use target::ConfigCommands;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Context;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file overriding `$HOME/.cs-cli.yaml`
    pub config: Option<PathBuf>,
    /// Skip TLS certificate verification
    pub ignore_cert: bool,
}

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Get resources
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },
    /// Create resources
    Create {
        #[command(subcommand)]
        command: CreateCommands,
    },
    /// Update resources
    Update {
        #[command(subcommand)]
        command: UpdateCommands,
    },
    /// Delete resources
    Delete {
        #[command(subcommand)]
        command: DeleteCommands,
    },
    /// Manage targets in the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum GetCommands {
    /// Get pipelines by ID, name or project
    Pipeline(GetPipelineArgs),
    /// Get executions by ID, name, status or project
    Execution(GetExecutionArgs),
    /// Get custom integrations by ID, name or project
    #[command(name = "customintegration", alias = "custom-integration")]
    CustomIntegration(GetCustomIntegrationArgs),
}

#[derive(Subcommand)]
pub enum CreateCommands {
    /// Create pipelines from YAML
    Pipeline(CreatePipelineArgs),
    /// Run a pipeline
    Execution(CreateExecutionArgs),
    /// Create custom integrations from YAML
    #[command(name = "customintegration", alias = "custom-integration")]
    CustomIntegration(CreateCustomIntegrationArgs),
}

#[derive(Subcommand)]
pub enum UpdateCommands {
    /// Change a pipeline's state or apply YAML definitions
    Pipeline(UpdatePipelineArgs),
    /// Replace a custom integration from YAML
    #[command(name = "customintegration", alias = "custom-integration")]
    CustomIntegration(UpdateCustomIntegrationArgs),
}

#[derive(Subcommand)]
pub enum DeleteCommands {
    /// Delete a pipeline
    Pipeline(DeletePipelineArgs),
    /// Delete an execution
    Execution(DeleteExecutionArgs),
    /// Delete a custom integration
    #[command(name = "customintegration", alias = "custom-integration")]
    CustomIntegration(DeleteCustomIntegrationArgs),
}

/// Handle a CLI command
///
/// Config commands work on the config file alone; every other command
/// resolves the active target first.
pub async fn handle_command(command: Commands, options: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Config { command } => target::handle_config_command(command, options),
        Commands::Get { command } => {
            let mut ctx = load_context(options)?;
            match command {
                GetCommands::Pipeline(args) => pipeline::get(args, &mut ctx).await,
                GetCommands::Execution(args) => execution::get(args, &mut ctx).await,
                GetCommands::CustomIntegration(args) => {
                    custom_integration::get(args, &mut ctx).await
                }
            }
        }
        Commands::Create { command } => {
            let mut ctx = load_context(options)?;
            match command {
                CreateCommands::Pipeline(args) => pipeline::create(args, &mut ctx).await,
                CreateCommands::Execution(args) => execution::create(args, &mut ctx).await,
                CreateCommands::CustomIntegration(args) => {
                    custom_integration::create(args, &mut ctx).await
                }
            }
        }
        Commands::Update { command } => {
            let mut ctx = load_context(options)?;
            match command {
                UpdateCommands::Pipeline(args) => pipeline::update(args, &mut ctx).await,
                UpdateCommands::CustomIntegration(args) => {
                    custom_integration::update(args, &mut ctx).await
                }
            }
        }
        Commands::Delete { command } => {
            let mut ctx = load_context(options)?;
            match command {
                DeleteCommands::Pipeline(args) => pipeline::delete(args, &mut ctx).await,
                DeleteCommands::Execution(args) => execution::delete(args, &mut ctx).await,
                DeleteCommands::CustomIntegration(args) => {
                    custom_integration::delete(args, &mut ctx).await
                }
            }
        }
    }
}

fn load_context(options: &GlobalOptions) -> Result<Context> {
    Context::load(options.config.as_deref(), options.ignore_cert)
}

/// Confirmation for a delete, using the id the service echoed back when
/// there is one
fn deleted_message(kind: &str, deleted_id: &str, requested_id: &str) -> String {
    let id = if deleted_id.is_empty() {
        requested_id
    } else {
        deleted_id
    };
    format!("✓ {} with id {} deleted", kind, id)
}
