//! CLI bootstrap - the composition root.
//!
//! Turns parsed arguments into a [`RelayConfig`] and builds the one
//! [`RelayTools`] instance every handler works through.

use tailrelay_core::RelayConfig;

use crate::parser::Cli;
use crate::tools::RelayTools;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub relay: RelayConfig,
}

impl CliConfig {
    pub fn with_defaults() -> Self {
        Self {
            relay: RelayConfig::with_defaults(),
        }
    }

    /// Apply the relay options given on the command line or in the environment.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            relay: RelayConfig::with_defaults()
                .with_host(cli.host.clone())
                .with_port(cli.port)
                .with_log_file(cli.log_file.clone())
                .with_ack_mode(cli.ack_mode),
        }
    }
}

/// Composed context handed to command handlers.
pub struct CliContext {
    pub tools: RelayTools,
}

impl CliContext {
    pub const fn tools(&self) -> &RelayTools {
        &self.tools
    }
}

/// Bootstrap the CLI application. No I/O happens until a tool runs.
pub fn bootstrap(config: CliConfig) -> CliContext {
    CliContext {
        tools: RelayTools::new(config.relay),
    }
}
