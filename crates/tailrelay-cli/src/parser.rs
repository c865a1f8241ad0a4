//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;
use tailrelay_core::{AckMode, DEFAULT_HOST, DEFAULT_LOG_FILE, DEFAULT_PORT};

use crate::commands::Commands;

/// Command-line interface for the log relay.
///
/// Relay options are global so they can follow any subcommand.
#[derive(Parser)]
#[command(name = "tailrelay")]
#[command(about = "Capture runtime logs over HTTP and tail them live")]
#[command(version)]
pub struct Cli {
    /// Host to bind the relay to
    #[arg(long, global = true, env = "TAILRELAY_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind the relay to
    #[arg(long, global = true, env = "TAILRELAY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Append-only log file
    #[arg(
        long = "log-file",
        global = true,
        env = "TAILRELAY_LOG_FILE",
        default_value = DEFAULT_LOG_FILE
    )]
    pub log_file: PathBuf,

    /// Ingestion response contract: `bare` or `json`
    #[arg(long = "ack-mode", global = true, env = "TAILRELAY_ACK_MODE", default_value = "bare")]
    pub ack_mode: AckMode,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
