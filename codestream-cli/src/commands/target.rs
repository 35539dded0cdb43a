//! Target management commands
//!
//! These work on the config file only and never contact a server.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use tracing::{info, warn};

use super::GlobalOptions;
use crate::config::{ConfigStore, Target};
use crate::output::target_table;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// List configured targets, marking the active one
    GetTarget,
    /// Select the active target
    UseTarget {
        /// Name of the target
        #[arg(short, long)]
        name: String,
    },
    /// Create or update a target
    SetTarget(SetTargetArgs),
    /// Remove a target
    DeleteTarget {
        /// Name of the target
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Args)]
pub struct SetTargetArgs {
    /// Name of the target
    #[arg(short, long)]
    pub name: String,

    /// Server FQDN or URL
    #[arg(long)]
    pub server: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub domain: Option<String>,

    /// API (refresh) token
    #[arg(long)]
    pub apitoken: Option<String>,
}

impl SetTargetArgs {
    fn settings(&self) -> Target {
        Target {
            server: self.server.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            domain: self.domain.clone(),
            apitoken: self.apitoken.clone(),
            accesstoken: None,
        }
    }
}

/// Handle a `config` subcommand
pub fn handle_config_command(command: ConfigCommands, options: &GlobalOptions) -> Result<()> {
    let mut store = ConfigStore::open(options.config.as_deref())?;
    apply(command, &mut store)
}

fn apply(command: ConfigCommands, store: &mut ConfigStore) -> Result<()> {
    match command {
        ConfigCommands::GetTarget => {
            if store.file.target.is_empty() {
                warn!("No targets configured in {}", store.path().display());
            } else {
                println!("{}", target_table(&store.file));
            }
        }
        ConfigCommands::UseTarget { name } => {
            store.use_target(&name)?;
            store.save()?;
            info!("Current target set to {}", name);
            println!("{}", format!("✓ Using target {}", name).green().bold());
        }
        ConfigCommands::SetTarget(args) => {
            let created = store.set_target(&args.name, args.settings());
            store.save()?;
            let verb = if created { "created" } else { "updated" };
            println!(
                "{}",
                format!("✓ Target {} {}", args.name, verb).green().bold()
            );
        }
        ConfigCommands::DeleteTarget { name } => {
            store.delete_target(&name)?;
            store.save()?;
            println!("{}", format!("✓ Target {} deleted", name).green().bold());
        }
    }
    Ok(())
}
