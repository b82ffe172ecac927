//! Configuration and project paths

use std::path::{Path, PathBuf};

/// Name used for the configuration directory
const APP_NAME: &str = "flash-harness";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/flash-harness/`
/// - macOS: `~/Library/Application Support/flash-harness/`
/// - Windows: `%APPDATA%\flash-harness\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Resolve `path` against `root` unless it is already absolute
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        root.join(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_toml() {
        if let Some(path) = config_path() {
            assert_eq!(path.file_name().unwrap(), "config.toml");
        }
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let root = Path::new("/work/project");
        assert_eq!(
            resolve(root, Path::new("build/c_project")),
            PathBuf::from("/work/project/build/c_project")
        );
        assert_eq!(
            resolve(root, Path::new("/opt/c_project")),
            PathBuf::from("/opt/c_project")
        );
    }
}
