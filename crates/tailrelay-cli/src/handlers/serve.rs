//! Serve command handler.
//!
//! Runs the relay in the foreground. Ctrl-C performs the same `stop` the
//! console offers, discarding the log unless `--keep-log` was given.

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::bootstrap::CliContext;

pub async fn execute(ctx: &CliContext, keep_log: bool) -> Result<()> {
    let tools = ctx.tools();

    let started = tools.start().await;
    if !tools.server().is_running().await {
        bail!(started);
    }
    println!("{started}");
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("Interrupt received, shutting down");

    let stopped = if keep_log {
        tools.stop_keep_log().await
    } else {
        tools.stop().await
    };
    println!("{stopped}");
    Ok(())
}
