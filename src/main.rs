//! Flash harness CLI - drives the flash driver test binary
//!
//! Builds op code argument vectors from test scenarios and runs the
//! harness binary once per scenario.

use clap::Parser;
use flash_harness::commands::Commands;
use flash_harness::common::config::Config;
use flash_harness::common::logging;
use flash_harness::{cli, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flash-harness", about = "Test driver for the flash harness binary")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    cli::dispatch(cli.command, config, cli.verbose).await
}
