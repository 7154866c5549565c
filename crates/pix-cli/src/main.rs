//! # pix CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pix_cli::fetch::{run_fetch, FetchArgs};
use pix_cli::inspect::{run_inspect, InspectArgs};
use pix_cli::objectify::{run_objectify, ObjectifyArgs};
use pix_core::Factory;

/// PIX data toolkit.
///
/// Promotes tagged structures in PIX JSON (mappings with a `class` key)
/// into typed objects and reports what was found.
#[derive(Parser, Debug)]
#[command(name = "pix", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every object in a JSON document, depth-first.
    Inspect(InspectArgs),

    /// Promote a JSON document and show where objects were created.
    Objectify(ObjectifyArgs),

    /// Fetch a path from the configured PIX endpoint.
    Fetch(FetchArgs),
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

    let factory = Factory::new();
    tracing::debug!(registry = ?factory.registry(), "pix CLI starting");

    let result = match cli.command {
        Commands::Inspect(args) => run_inspect(&args, &factory),
        Commands::Objectify(args) => run_objectify(&args, &factory),
        Commands::Fetch(args) => run_fetch(&args, &factory),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
