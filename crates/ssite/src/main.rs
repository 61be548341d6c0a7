//! ssite CLI - static site ingestion and analysis.
//!
//! Provides commands for:
//! - `check`: Build the site and print a summary
//! - `show`: List every registered page
//! - `archetype`: Print a content archetype

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ArchetypeArgs, CheckArgs, ShowArgs};
use output::Output;

/// ssite - static site ingestion and analysis.
#[derive(Parser)]
#[command(name = "ssite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site and print a summary.
    Check(CheckArgs),
    /// List every registered page.
    Show(ShowArgs),
    /// Print the front matter and body of an archetype.
    Archetype(ArchetypeArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Check(args) => args.site.verbose,
            Self::Show(args) => args.site.verbose,
            Self::Archetype(args) => args.site.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Show(args) => args.execute(),
        Commands::Archetype(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
