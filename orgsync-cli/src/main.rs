//! orgsync: keep an organisation's repository labels and team roster in sync.
//!
//! # Usage
//!
//! ```text
//! orgsync [--config <path>] [-v|-vv] <command>
//! orgsync labels sync [REPO...] [--destructive] [--dry-run] [--keep-going]
//! orgsync labels plan <REPO> [--destructive]
//! orgsync labels list
//! orgsync roster show
//! orgsync roster publish [--dry-run]
//! orgsync roster diff
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{labels::LabelsCommand, roster::RosterCommand};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "orgsync",
    version,
    about = "Reconcile GitHub labels and publish the team roster",
    long_about = None,
)]
struct Cli {
    /// Config file to use instead of ~/.orgsync/config.yaml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile repository labels against the configured catalog.
    Labels {
        #[command(subcommand)]
        command: LabelsCommand,
    },

    /// Build and publish the team roster databag.
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Labels { command } => commands::labels::run(command, config),
        Commands::Roster { command } => commands::roster::run(command, config),
    }
}
