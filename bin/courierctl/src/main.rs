//! ---
//! courier_section: "05-external-interfaces"
//! courier_subsection: "binary"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Command line tool to build, inspect and answer envelopes."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use courier_common::{init_tracing, CourierConfig};
use tracing::debug;

mod build;
mod input;
mod inspect;
mod reply;

const DEFAULT_CONFIG_CANDIDATES: &[&str] = &["courier.toml", "configs/courier.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Build, inspect and answer courier envelopes",
    long_about = None
)]
struct Cli {
    /// Configuration file; defaults to ./courier.toml or ./configs/courier.toml when present.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Assemble an envelope from flags and print its wire JSON.
    Build(build::BuildCommand),
    /// Validate a wire envelope and summarise it.
    Inspect(inspect::InspectCommand),
    /// Build the reply to a wire envelope, carrying over requested headers.
    Reply(reply::ReplyCommand),
}

fn load_config(explicit: Option<&PathBuf>) -> Result<CourierConfig> {
    match explicit {
        Some(path) => CourierConfig::load(&[path]),
        None => CourierConfig::load_or_default(DEFAULT_CONFIG_CANDIDATES),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing("courierctl", &config.logging)?;
    debug!(command = ?cli.command, "courierctl starting");

    match cli.command {
        Commands::Build(cmd) => cmd.execute(&config),
        Commands::Inspect(cmd) => cmd.execute(),
        Commands::Reply(cmd) => cmd.execute(&config),
    }
}
