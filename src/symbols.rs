//! `CFG_*` symbol extraction from the flash configuration header
//!
//! Only lines of the exact shape `#define CFG_<NAME> <VALUE>` are picked up.
//! Anything else, including a define with trailing tokens, is skipped
//! without a warning.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::common::{Error, Result};

/// Prefix that marks a configuration define
const CFG_PREFIX: &str = "#define CFG_";

/// Symbol name to raw value, as written in the header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CfgSymbols(BTreeMap<String, String>);

impl CfgSymbols {
    /// Parse symbols from header text
    pub fn parse(content: &str) -> Self {
        let mut symbols = BTreeMap::new();

        for line in content.lines() {
            let line = line.trim();
            if !line.starts_with(CFG_PREFIX) {
                continue;
            }

            // Exactly `#define KEY VALUE`
            let mut parts = line.split_whitespace();
            if let (Some(_), Some(key), Some(value), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            {
                symbols.insert(key.to_string(), value.to_string());
            }
        }

        Self(symbols)
    }

    /// Raw value of a symbol
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value of a symbol read as a C integer literal
    ///
    /// Accepts decimal, `0x` hex, leading-`0` octal and `0b` binary with
    /// optional `u`/`l` suffixes.
    /// Returns `None` for anything else, e.g. values that are expressions.
    pub fn get_integer(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(parse_c_integer)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Read and parse the configuration header at `path`
pub fn parse_cfg_symbols(path: &Path) -> Result<CfgSymbols> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
    let symbols = CfgSymbols::parse(&content);
    tracing::debug!(path = %path.display(), count = symbols.len(), "Parsed config header");
    Ok(symbols)
}

/// Parse a C integer literal such as `42`, `0x08000000`, `010` or `4096UL`
///
/// A leading `0` means octal, as in C; `0b` binary is accepted too.
pub fn parse_c_integer(literal: &str) -> Option<u64> {
    let digits = literal.trim_end_matches(['u', 'U', 'l', 'L']);
    let (body, radix) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(bin) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (bin, 2)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (&digits[1..], 8)
    } else {
        (digits, 10)
    };

    // from_str_radix accepts a sign; C literals do not carry one
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(body, radix).ok()
}
