//! Workspace configuration.
//!
//! Read from `.epoch-sense.yaml` in the workspace root. Every field has a
//! default, so the file is optional and may set only what it changes:
//!
//! ```yaml
//! source-extension: epoch
//! excluded-dirs: [target, build]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the configuration file in the workspace root
pub const CONFIG_FILE_NAME: &str = ".epoch-sense.yaml";

/// Default source file extension, without the dot
pub const DEFAULT_SOURCE_EXTENSION: &str = "epoch";

/// Workspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Extension of source files to parse, without the dot; matched case-insensitively
    pub source_extension: String,

    /// Directory names never descended into when scanning a workspace
    pub excluded_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            excluded_dirs: ["target", "bin", "obj", "build", "dist", "node_modules"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.epoch-sense.yaml` from `workspace_root`, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    pub fn discover(workspace_root: &Path) -> Result<Self> {
        let path = workspace_root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns `true` if `path` names a source file.
    ///
    /// The path must end with `.` followed by the source extension, compared
    /// without regard to ASCII case.
    #[must_use]
    pub fn is_source_file(&self, path: &Path) -> bool {
        let path = path.to_string_lossy().to_ascii_lowercase();
        let suffix = format!(".{}", self.source_extension.to_ascii_lowercase());
        path.ends_with(&suffix)
    }

    /// Returns `true` if a directory with this name is skipped when scanning.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }

    fn validate(&self) -> Result<()> {
        let ext = &self.source_extension;
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "source-extension must be a bare extension like 'epoch', got '{ext}'"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("src/shapes.epoch", true)]
    #[case::upper("SHAPES.EPOCH", true)]
    #[case::mixed("lib/Shapes.Epoch", true)]
    #[case::dotfile(".epoch", true)]
    #[case::other_ext("shapes.rs", false)]
    #[case::no_dot("notepoch", false)]
    #[case::suffix_in_middle("shapes.epoch.bak", false)]
    fn source_file_filter(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(Config::default().is_source_file(Path::new(path)), expected);
    }

    #[test]
    fn defaults_exclude_build_directories() {
        let config = Config::default();

        assert_eq!(config.source_extension, "epoch");
        assert!(config.is_excluded_dir("target"));
        assert!(!config.is_excluded_dir("src"));
    }

    #[test]
    fn discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");

        let config = Config::discover(dir.path()).expect("defaults should load");

        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "source-extension: ep\n")
            .expect("should write config");

        let config = Config::discover(dir.path()).expect("config should load");

        assert_eq!(config.source_extension, "ep");
        assert_eq!(config.excluded_dirs, Config::default().excluded_dirs);
        assert!(config.is_source_file(Path::new("x.EP")));
    }

    #[rstest]
    #[case::unknown_field("colour: blue\n")]
    #[case::wrong_type("excluded-dirs: 5\n")]
    #[case::dotted_extension("source-extension: .epoch\n")]
    #[case::empty_extension("source-extension: ''\n")]
    fn invalid_files_are_config_errors(#[case] content: &str) {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, content).expect("should write config");

        let err = Config::load(&path).unwrap_err();

        assert!(matches!(err, Error::Config(_)), "got: {err}");
    }
}
