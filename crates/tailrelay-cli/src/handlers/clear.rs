//! Clear command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Truncate the log file without touching any running relay.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    println!("{}", ctx.tools().clear().await);
    Ok(())
}
