//! Flash harness - a test driver for the flash driver harness binary
//!
//! Parses `CFG_*` symbols from the flash configuration header and runs the
//! harness binary with op code sequences taken from test scenarios.

pub mod cli;
pub mod commands;
pub mod common;
pub mod protocol;
pub mod symbols;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use protocol::{build_args, OpCode};
pub use symbols::{parse_cfg_symbols, CfgSymbols};
