//! Code Stream CLI
//!
//! Command-line interface for listing and managing pipelines, executions and
//! custom integrations on a Code Stream server.

mod commands;
mod config;
mod import;
mod output;
mod session;

use clap::Parser;
use commands::{Commands, GlobalOptions, handle_command};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(about = "CLI for Code Stream pipelines, executions and custom integrations", long_about = None)]
struct Cli {
    /// Config file (default is $HOME/.cs-cli.yaml)
    #[arg(long, env = "CS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable HTTPS certificate verification
    #[arg(short = 'k', long = "ignoreCertificateWarnings", global = true)]
    ignore_certificate_warnings: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Filter used when `RUST_LOG` is unset
///
/// The binary logs under its crate name (`cs_cli`), not the package name.
fn default_directive(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!(
        "{}={level},codestream_client={level}",
        env!("CARGO_CRATE_NAME")
    )
}

fn init_tracing(debug: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(debug).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let options = GlobalOptions {
        config: cli.config,
        ignore_cert: cli.ignore_certificate_warnings,
    };

    if let Err(e) = handle_command(cli.command, &options).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
