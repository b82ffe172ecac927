//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML scenario files.

use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};
use crate::protocol::{OpCode, PROTOCOL_VERSION};

/// A set of scenarios, run in order
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioSet {
    /// Op code table version the scenarios were written against
    pub protocol_version: Option<u32>,
    /// The scenarios to execute
    pub scenarios: Vec<TestScenario>,
}

/// A single end-to-end scenario against the harness binary
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TestScenario {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the scenario exercises
    pub description: Option<String>,
    /// Operations, in the order the binary performs them
    pub ops: Vec<OpCode>,
}

impl TestScenario {
    pub fn new(name: impl Into<String>, ops: Vec<OpCode>) -> Self {
        Self {
            name: name.into(),
            description: None,
            ops,
        }
    }
}

impl ScenarioSet {
    /// The default scenario table: seed test data, init, write
    pub fn builtin() -> Self {
        Self {
            protocol_version: Some(PROTOCOL_VERSION),
            scenarios: vec![TestScenario {
                name: "init-and-write".to_string(),
                description: Some("Seed test data, initialize flash, write once".to_string()),
                ops: vec![OpCode::InitTestData, OpCode::Init, OpCode::Write],
            }],
        }
    }

    /// Load and validate a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        Self::parse(&content).map_err(|e| match e {
            Error::ScenarioParse { reason, .. } => Error::ScenarioParse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse and validate scenario YAML
    pub fn parse(content: &str) -> Result<Self> {
        let set: ScenarioSet = serde_yaml::from_str(content).map_err(|e| Error::ScenarioParse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        set.check_protocol()?;
        Ok(set)
    }

    /// Reject scenarios written against a different op code table
    pub fn check_protocol(&self) -> Result<()> {
        match self.protocol_version {
            Some(found) if found != PROTOCOL_VERSION => Err(Error::ProtocolMismatch {
                expected: PROTOCOL_VERSION,
                found,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let set = ScenarioSet::builtin();
        assert_eq!(set.scenarios.len(), 1);
        assert_eq!(
            set.scenarios[0].ops,
            vec![OpCode::InitTestData, OpCode::Init, OpCode::Write]
        );
        assert!(set.check_protocol().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let set = ScenarioSet::parse(
            r#"
protocol_version: 1
scenarios:
  - name: double-write
    description: Write twice after init
    ops: [INIT_TEST_DATA, INIT, WRITE, WRITE]
  - name: update
    ops: [INIT, UPDATE_APP_DATA]
"#,
        )
        .unwrap();

        assert_eq!(set.scenarios.len(), 2);
        assert_eq!(set.scenarios[0].name, "double-write");
        assert_eq!(set.scenarios[0].ops.len(), 4);
        assert_eq!(set.scenarios[1].description, None);
        assert_eq!(set.scenarios[1].ops, vec![OpCode::Init, OpCode::UpdateData]);
    }

    #[test]
    fn test_missing_protocol_version_is_accepted() {
        let set = ScenarioSet::parse("scenarios:\n  - name: a\n    ops: [INIT]\n").unwrap();
        assert_eq!(set.protocol_version, None);
    }

    #[test]
    fn test_protocol_mismatch_is_rejected() {
        let err = ScenarioSet::parse("protocol_version: 2\nscenarios: []\n").unwrap_err();
        assert!(matches!(
            err,
            Error::ProtocolMismatch {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let err = ScenarioSet::parse("scenarios:\n  - name: a\n    ops: [ERASE]\n").unwrap_err();
        match err {
            Error::ScenarioParse { reason, .. } => assert!(reason.contains("ERASE")),
            other => panic!("Expected ScenarioParse, got {other:?}"),
        }
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.yaml");
        std::fs::write(&path, "scenarios: 3\n").unwrap();

        match ScenarioSet::load(&path).unwrap_err() {
            Error::ScenarioParse { path: p, .. } => assert!(p.ends_with("scenarios.yaml")),
            other => panic!("Expected ScenarioParse, got {other:?}"),
        }
    }
}
