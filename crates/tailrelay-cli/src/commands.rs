//! Subcommands of the `tailrelay` binary.

use clap::Subcommand;

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the relay in the foreground until Ctrl-C
    Serve {
        /// Keep the log file when shutting down
        #[arg(long)]
        keep_log: bool,
    },

    /// Drive the relay interactively: start, stop, clear, status, read
    Console,

    /// Truncate the log file
    Clear,

    /// Print the log file
    Read,

    /// Show the resolved bind address and log file
    Paths,
}
