//! Registry configuration.
//!
//! # Responsibility
//! - Declare which packages are mandatory (cannot be disabled) and which start
//!   disabled.
//! - Carry optional logging settings for hosts that bootstrap from one file.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Process-wide registry policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Package names or URIs whose enabled flag cannot be cleared.
    pub mandatory_packages: BTreeSet<String>,
    /// Package names or URIs registered with the enabled flag cleared.
    pub disabled_packages: BTreeSet<String>,
    /// Log level handed to `init_logging` (`trace|debug|info|warn|error`).
    pub log_level: Option<String>,
    /// Absolute log directory handed to `init_logging`.
    pub log_dir: Option<String>,
}

impl RegistryConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Parse {
            path: None,
            message: err.to_string(),
        })
    }

    pub fn with_mandatory(mut self, package: impl Into<String>) -> Self {
        self.mandatory_packages.insert(package.into());
        self
    }

    pub fn with_disabled(mut self, package: impl Into<String>) -> Self {
        self.disabled_packages.insert(package.into());
        self
    }

    pub fn is_mandatory(&self, package: &str) -> bool {
        self.mandatory_packages.contains(package)
    }

    pub fn is_disabled(&self, package: &str) -> bool {
        self.disabled_packages.contains(package)
    }

    /// Whether a package known by any of `keys` starts enabled; mandatory
    /// packages always do.
    pub fn starts_enabled<'a>(&self, keys: impl IntoIterator<Item = &'a str> + Clone) -> bool {
        self.is_mandatory_any(keys.clone())
            || !keys.into_iter().any(|key| self.is_disabled(key))
    }

    /// Whether a package known by any of `keys` is mandatory.
    pub fn is_mandatory_any<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> bool {
        keys.into_iter().any(|key| self.is_mandatory(key))
    }
}

/// Reads a JSON registry config from disk.
pub fn load_config(path: &Path) -> Result<RegistryConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|err| ConfigError::Parse {
        path: Some(path.to_path_buf()),
        message: err.to_string(),
    })
}

/// Config loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        message: String,
    },
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "failed to read config `{}`: {message}", path.display())
            }
            Self::Parse {
                path: Some(path),
                message,
            } => write!(f, "invalid config `{}`: {message}", path.display()),
            Self::Parse {
                path: None,
                message,
            } => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{load_config, ConfigError, RegistryConfig};
    use std::io::Write;

    #[test]
    fn empty_object_is_default_config() {
        let config = RegistryConfig::from_json_str("{}").expect("empty config");
        assert_eq!(config, RegistryConfig::default());
        assert!(config.starts_enabled(["layout"]));
    }

    #[test]
    fn mandatory_packages_always_start_enabled() {
        let config = RegistryConfig::default()
            .with_mandatory("core")
            .with_disabled("core")
            .with_disabled("render");
        assert!(config.starts_enabled(["core"]));
        assert!(!config.starts_enabled(["render"]));
    }

    #[test]
    fn policy_matches_any_identity_form() {
        let config = RegistryConfig::default()
            .with_mandatory("urn:pkg:core")
            .with_disabled("urn:pkg:render");
        assert!(config.is_mandatory_any(["core", "urn:pkg:core"]));
        assert!(!config.is_mandatory_any(["core"]));
        assert!(!config.starts_enabled(["render", "urn:pkg:render"]));
        assert!(config.starts_enabled(["render"]));
    }

    #[test]
    fn loads_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config file");
        write!(
            file,
            r#"{{"mandatory_packages":["core"],"disabled_packages":["render"],"log_level":"debug"}}"#
        )
        .expect("write config");

        let config = load_config(file.path()).expect("config loads");
        assert!(config.is_mandatory("core"));
        assert!(config.disabled_packages.contains("render"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn reports_missing_file_as_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_config(&dir.path().join("missing.json")).expect_err("missing file");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn reports_malformed_json_as_parse_error() {
        let err = RegistryConfig::from_json_str("{\"mandatory_packages\": 3}")
            .expect_err("wrong field type");
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
        assert!(err.to_string().starts_with("invalid config"));
    }
}
