//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use tailrelay_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::from_cli(&cli);
    let ctx = bootstrap(config);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve { keep_log } => handlers::serve::execute(&ctx, keep_log).await?,
        Commands::Console => handlers::console::execute(&ctx).await?,
        Commands::Clear => handlers::clear::execute(&ctx).await?,
        Commands::Read => handlers::read::execute(&ctx).await?,
        Commands::Paths => handlers::paths::execute(&ctx)?,
    }

    Ok(())
}
