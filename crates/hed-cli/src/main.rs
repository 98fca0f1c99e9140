//! # hedv CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hed_cli::schema::{run_schema, SchemaArgs};
use hed_cli::validate::{run_validate, ValidateArgs};

/// HED annotation validator.
///
/// Checks annotation strings against a schema attribute dictionary:
/// delimiter structure, tag existence, units, required children, and
/// tag-list constraints.
#[derive(Parser, Debug)]
#[command(name = "hedv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML validator configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate annotation strings against a schema.
    Validate(ValidateArgs),

    /// Summarize a schema attribute dictionary snapshot.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "hedv starting");

    let repo_root = resolve_repo_root().unwrap_or_else(|| {
        tracing::debug!("no schemas/ directory above cwd; resolving paths from cwd");
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });

    let result = match cli.command {
        Commands::Validate(args) => hed_cli::load_config(cli.config.as_deref())
            .and_then(|base| run_validate(&args, base, &repo_root)),
        Commands::Schema(args) => run_schema(&args, &repo_root),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Walk up from the current directory to the first one containing a
/// `schemas/` directory.
fn resolve_repo_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut dir = cwd.as_path();
    loop {
        if dir.join("schemas").is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
