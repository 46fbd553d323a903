//! Command-line interface for envcfg
//!
//! Provides `get`, `dump`, `paths` and `completions` subcommands over a
//! shared set of resolution options.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod dump;
mod get;
mod paths;
mod utils;

/// Resolve per-environment configuration files
#[derive(Parser)]
#[command(name = "envcfg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a dotted key
    Get(get::GetArgs),

    /// Print the whole merged configuration
    Dump(dump::DumpArgs),

    /// Show which config files would be loaded
    Paths(paths::PathsArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Get(args) => get::run(args),
        Commands::Dump(args) => dump::run(args),
        Commands::Paths(args) => paths::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "envcfg", &mut std::io::stdout());
            Ok(())
        }
    }
}
