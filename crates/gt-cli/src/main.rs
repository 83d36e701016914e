use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gt_cli::commands::{exercises, parse};
use gt_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Parse { cell }) => {
            let mut stdout = std::io::stdout().lock();
            parse::run(&mut stdout, cell)?;
        }
        Some(Commands::Exercises { json, input }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            let mut stdout = std::io::stdout().lock();
            if let Err(err) = exercises::run(&mut stdout, &config, *json, input.as_deref()) {
                // In JSON mode a total failure still emits the wire envelope.
                if *json {
                    let payload = gt_core::ErrorResponse {
                        error: format!("{err:#}"),
                    };
                    eprintln!("{}", serde_json::to_string(&payload)?);
                    std::process::exit(1);
                }
                return Err(err);
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
