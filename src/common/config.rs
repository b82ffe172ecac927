//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::{self, config_path};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Project layout settings
    #[serde(default)]
    pub project: ProjectConfig,

    /// Runner settings
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Where the harness binary and configuration header live
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project root; the binary runs with this as its working directory
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Harness binary, relative to the project root
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Configuration header, relative to the project root
    #[serde(default = "default_header")]
    pub header: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: None,
            binary: default_binary(),
            header: default_header(),
        }
    }
}

fn default_binary() -> PathBuf {
    PathBuf::from("build/c_project")
}

fn default_header() -> PathBuf {
    PathBuf::from("flash_conf.h")
}

/// Runner settings
#[derive(Debug, Deserialize)]
pub struct RunnerConfig {
    /// Per-case timeout for the harness binary
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, &e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Absolute project root, falling back to the current directory
    ///
    /// A relative root is taken against the current directory, not against
    /// the root itself, which is where the binary later runs.
    pub fn project_root(&self) -> Result<PathBuf> {
        match &self.project.root {
            Some(root) => std::path::absolute(root).map_err(|e| {
                super::Error::Config(format!(
                    "Invalid project root '{}': {}",
                    root.display(),
                    e
                ))
            }),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Absolute path of the harness binary
    pub fn binary_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.project.binary)
    }

    /// Absolute path of the configuration header
    pub fn header_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.project.header)
    }

    /// Per-case timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.runner.timeout_secs)
    }
}
