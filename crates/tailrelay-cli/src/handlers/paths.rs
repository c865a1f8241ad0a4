//! Paths command handler.
//!
//! Displays the resolved bind address and log file in `key = value` form,
//! which is what to check when a client cannot find the relay.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Render the resolved locations.
pub fn render(ctx: &CliContext) -> String {
    let config = ctx.tools().server().config();
    let log_file = ctx.tools().log_file();
    let absolute = std::path::absolute(log_file).unwrap_or_else(|_| log_file.to_path_buf());
    format!(
        "bind_address = {}\nlog_file = {}\nack_mode = {}",
        config.bind_address(),
        absolute.display(),
        config.ack_mode
    )
}

pub fn execute(ctx: &CliContext) -> Result<()> {
    println!("{}", render(ctx));
    Ok(())
}
