//! Target connection
//!
//! Builds an authenticated client for the active target before a command
//! issues any resource request.

use anyhow::{Context as _, Result};
use codestream_client::CodeStreamClient;
use tracing::debug;

use crate::config::Context;

/// Connect to the active target with a working access token
///
/// Tokens issued along the way are written back to the config file.
pub async fn connect(ctx: &mut Context) -> Result<CodeStreamClient> {
    let base_url = ctx.target.base_url()?;
    debug!(%base_url, ignore_cert = ctx.ignore_cert, "connecting to target");

    let mut client = CodeStreamClient::connect(&base_url, ctx.ignore_cert)?;
    let session = client
        .ensure_session(&ctx.target.credentials())
        .await
        .with_context(|| format!("Unable to connect to {}", base_url))?;

    ctx.persist_session(&session)?;
    Ok(client)
}
