//! Scenario runner for the flash harness binary
//!
//! Scenarios come from a YAML file or the built-in table and are turned
//! into op code argument vectors for the binary.

mod config;
mod runner;

pub use config::*;
pub use runner::{print_summary, CaseOutcome, Runner, TestResult};
