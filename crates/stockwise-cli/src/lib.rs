//! Stockwise command-line interface.

pub mod commands;
pub mod logging;
pub mod render;

use clap::{Parser, Subcommand};
use std::path::Path;
use stockwise_core::{env, Config};

/// Stockwise - question answering over inventory transactions
#[derive(Parser)]
#[command(name = "stockwise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "STOCKWISE_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build or load the index and start the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Build the index without serving
    Index(commands::index::IndexArgs),

    /// Ask a running server a question
    Ask(commands::ask::AskArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    env::load_dotenv()?;

    match cli.command {
        Commands::Serve(args) => {
            let config = setup(cli.config.as_deref(), cli.verbose)?;
            commands::serve::run(args, config).await
        }
        Commands::Index(args) => {
            let config = setup(cli.config.as_deref(), cli.verbose)?;
            commands::index::run(args, config).await
        }
        Commands::Ask(args) => {
            let config = setup(cli.config.as_deref(), cli.verbose)?;
            commands::ask::run(args, &config).await
        }
        Commands::Config(args) => commands::config::run(args, cli.config.as_deref()),
        Commands::Version => {
            println!("stockwise {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Resolve the effective config and install logging from it.
fn setup(path: Option<&Path>, verbose: u8) -> anyhow::Result<Config> {
    let config = Config::resolve(path)?;
    logging::init(&config.logging, verbose)?;
    Ok(config)
}
