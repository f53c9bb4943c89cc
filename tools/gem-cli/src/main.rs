//! Gem CLI - search GemVault gemstone catalogs from the command line.
//!
//! Commands:
//! - `gem search` - Filter, sort and page through a catalog
//! - `gem ranges` - Show the numeric filter domains of a catalog
//! - `gem options` - Show the categorical filter values of a catalog
//! - `gem criteria` - Create, check and save filter criteria files
//! - `gem config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CatalogArgs, ConfigArgs, CriteriaArgs, SearchArgs};

/// Gem CLI - faceted search over gemstone catalogs
#[derive(Parser)]
#[command(name = "gem")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search(SearchArgs),

    /// Show numeric filter domains (max price, weight, dimensions, yield)
    Ranges(CatalogArgs),

    /// Show categorical filter values
    Options(CatalogArgs),

    /// Manage filter criteria files
    Criteria(CriteriaArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Ranges(args) => commands::domains::run_ranges(args, &ctx).await,
        Commands::Options(args) => commands::domains::run_options(args, &ctx).await,
        Commands::Criteria(args) => commands::criteria::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
