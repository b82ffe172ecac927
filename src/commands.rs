//! CLI command definitions
//!
//! Defines the clap commands for the flash harness CLI.

use clap::Subcommand;
use std::path::PathBuf;

use crate::protocol::OpCode;

#[derive(Subcommand)]
pub enum Commands {
    /// Run test scenarios against the harness binary
    Run {
        /// Project root; the binary runs with this as its working directory
        #[arg(long)]
        root: Option<PathBuf>,

        /// Harness binary, relative to the project root (default: build/c_project)
        #[arg(long)]
        binary: Option<PathBuf>,

        /// Configuration header, relative to the project root (default: flash_conf.h)
        #[arg(long)]
        header: Option<PathBuf>,

        /// YAML scenario file (default: built-in scenario table)
        #[arg(long, short)]
        scenarios: Option<PathBuf>,

        /// Per-scenario timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show the CFG_* symbols parsed from the configuration header
    Symbols {
        /// Project root (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Configuration header, relative to the project root (default: flash_conf.h)
        #[arg(long)]
        header: Option<PathBuf>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the argument vector for a sequence of op codes without running anything
    Args {
        /// Op codes: INIT, WRITE, UPDATE_DATA, INIT_TEST_DATA
        #[arg(required = true)]
        ops: Vec<OpCode>,
    },
}
