//! Error types for the flash harness
//!
//! Only configuration-level problems are errors. A test case whose binary
//! exits non-zero is reported by the runner and is not an `Error`.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the flash harness
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid scenario file '{path}': {reason}")]
    ScenarioParse { path: String, reason: String },

    // === Protocol Errors ===
    #[error("Op code protocol mismatch: harness speaks version {expected}, scenarios declare version {found}")]
    ProtocolMismatch { expected: u32, found: u32 },

    #[error("Unknown op code '{0}'. Expected one of: INIT, WRITE, UPDATE_DATA, INIT_TEST_DATA")]
    UnknownOpCode(String),

    // === Process Errors ===
    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file read error for `path`
    pub fn file_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a spawn error for `program`
    pub fn spawn(program: &std::path::Path, error: &io::Error) -> Self {
        Self::Spawn {
            program: program.display().to_string(),
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_read_message_names_path() {
        let err = Error::file_read(
            std::path::Path::new("flash_conf.h"),
            &io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to read file 'flash_conf.h': not found"
        );
    }

    #[test]
    fn test_protocol_mismatch_message() {
        let err = Error::ProtocolMismatch {
            expected: 1,
            found: 2,
        };
        assert!(err.to_string().contains("version 1"));
        assert!(err.to_string().contains("version 2"));
    }
}
