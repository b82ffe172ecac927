//! Op code protocol spoken to the harness binary
//!
//! The binary is invoked as `<binary> <count> <code_1> ... <code_count>`
//! where every argument is a base-10 integer. The code table below must
//! match the binary's own opcode enum; bump [`PROTOCOL_VERSION`] whenever
//! it changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::Error;

/// Version of the op code table
pub const PROTOCOL_VERSION: u32 = 1;

/// A single operation the harness binary can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpCode {
    /// Initialize the flash driver with the app configuration
    Init,
    /// Write app data to flash
    Write,
    /// Update the in-memory app data
    UpdateData,
    /// Fill the app data with the test pattern
    InitTestData,
}

impl OpCode {
    /// Every op code, in code order
    pub const ALL: [OpCode; 4] = [
        OpCode::Init,
        OpCode::Write,
        OpCode::UpdateData,
        OpCode::InitTestData,
    ];

    /// Integer code passed on the command line
    pub const fn code(self) -> u8 {
        match self {
            OpCode::Init => 0,
            OpCode::Write => 1,
            OpCode::UpdateData => 2,
            OpCode::InitTestData => 3,
        }
    }

    /// Look up an op code by its integer code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    /// Canonical name as used in scenario files
    pub const fn name(self) -> &'static str {
        match self {
            OpCode::Init => "INIT",
            OpCode::Write => "WRITE",
            OpCode::UpdateData => "UPDATE_DATA",
            OpCode::InitTestData => "INIT_TEST_DATA",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OpCode {
    type Err = Error;

    /// Names are case-insensitive; `-` and `_` are interchangeable.
    /// The binary's own names (`UPDATE_APP_DATA`, `INIT_APP_DATA`) are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "INIT" => Ok(OpCode::Init),
            "WRITE" => Ok(OpCode::Write),
            "UPDATE_DATA" | "UPDATE_APP_DATA" => Ok(OpCode::UpdateData),
            "INIT_TEST_DATA" | "INIT_APP_DATA" => Ok(OpCode::InitTestData),
            _ => Err(Error::UnknownOpCode(s.to_string())),
        }
    }
}

impl TryFrom<String> for OpCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Build the argument vector for a sequence of op codes
///
/// The first element is the op count, followed by each op's code in order.
pub fn build_args(ops: &[OpCode]) -> Vec<String> {
    std::iter::once(ops.len().to_string())
        .chain(ops.iter().map(|op| op.code().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_binary_table() {
        assert_eq!(OpCode::Init.code(), 0);
        assert_eq!(OpCode::Write.code(), 1);
        assert_eq!(OpCode::UpdateData.code(), 2);
        assert_eq!(OpCode::InitTestData.code(), 3);
    }

    #[test]
    fn test_from_code() {
        for op in OpCode::ALL {
            assert_eq!(OpCode::from_code(op.code()), Some(op));
        }
        assert_eq!(OpCode::from_code(4), None);
    }

    #[test]
    fn test_build_args_default_scenario() {
        let args = build_args(&[OpCode::InitTestData, OpCode::Init, OpCode::Write]);
        assert_eq!(args, vec!["3", "3", "0", "1"]);
    }

    #[test]
    fn test_build_args_empty() {
        assert_eq!(build_args(&[]), vec!["0"]);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("INIT".parse::<OpCode>().unwrap(), OpCode::Init);
        assert_eq!("write".parse::<OpCode>().unwrap(), OpCode::Write);
        assert_eq!("update-data".parse::<OpCode>().unwrap(), OpCode::UpdateData);
        assert_eq!("UPDATE_APP_DATA".parse::<OpCode>().unwrap(), OpCode::UpdateData);
        assert_eq!("INIT_APP_DATA".parse::<OpCode>().unwrap(), OpCode::InitTestData);
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "ERASE".parse::<OpCode>().unwrap_err();
        assert!(matches!(err, Error::UnknownOpCode(ref name) if name == "ERASE"));
    }

    #[test]
    fn test_serialize_uses_canonical_names() {
        let json = serde_json::to_string(&[OpCode::UpdateData, OpCode::InitTestData]).unwrap();
        assert_eq!(json, r#"["UPDATE_DATA","INIT_TEST_DATA"]"#);
    }
}
