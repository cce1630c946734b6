//! PriceScout CLI - identify a product from a photo and compare estimated prices.
//!
//! A vision model names the product in the photo, a text model estimates what
//! it costs across Indian retailers, and the replies are turned into a sorted
//! comparison table with summary statistics. Prices are AI estimates.
//!
//! # Usage
//!
//! ```bash
//! # Identify a product and compare prices
//! pricescout identify headphones.jpg
//!
//! # Search by name, machine-readable output
//! pricescout search Sony WH-1000XM5 --format json
//!
//! # Guided mode
//! pricescout
//! ```

use std::io::IsTerminal;

use clap::{CommandFactory, Parser, Subcommand};

mod cli;
mod logging;

/// PriceScout - identify a product from a photo and compare estimated prices.
#[derive(Parser, Debug)]
#[command(name = "pricescout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Runs interactive mode when omitted on a terminal
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Identify the product in a photo, then compare prices
    Identify(cli::identify::IdentifyArgs),

    /// Compare prices for a product name
    Search(cli::search::SearchArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match pricescout_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `pricescout config path`."
            );
            pricescout_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("PriceScout v{}", pricescout_core::VERSION);

    match cli.command {
        Some(Commands::Identify(args)) => cli::identify::execute(args, &config).await,
        Some(Commands::Search(args)) => cli::search::execute(args, &config).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() => {
            cli::interactive::run(config).await
        }
        None => Cli::command()
            .error(
                clap::error::ErrorKind::MissingSubcommand,
                "a subcommand is required when not running in a terminal",
            )
            .exit(),
    }
}
