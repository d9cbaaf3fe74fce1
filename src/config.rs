/*!
 * Configuration types for the AMX client
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AmxError, Result};

/// Object name of the root bean of an AMX tree
pub const DEFAULT_ROOT: &str = "amx:pp=,type=domain-root";

/// Main configuration for the AMX client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// JSON snapshot of beans served by the in-memory connection
    #[serde(default)]
    pub snapshot: Option<PathBuf>,

    /// Object name where tree walks start
    #[serde(default = "default_root")]
    pub root: String,

    /// Deepest level printed by a tree walk
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
            snapshot: None,
            root: default_root(),
            max_depth: default_max_depth(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_max_depth() -> usize {
    16
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| AmxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| AmxError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/amx/config.toml`, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("amx").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.root, DEFAULT_ROOT);
        assert_eq!(config.max_depth, 16);
        assert!(config.snapshot.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            log_level = "debug"
            snapshot = "/var/lib/amx/beans.json"
        "#;

        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.snapshot, Some(PathBuf::from("/var/lib/amx/beans.json")));
        assert_eq!(config.root, DEFAULT_ROOT);
        assert_eq!(config.max_depth, 16);
    }

    #[test]
    fn test_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let config = ClientConfig {
            verbose: true,
            max_depth: 3,
            root: "amx:pp=/,type=cache".to_string(),
            ..Default::default()
        };

        config.to_file(file.path()).unwrap();
        let loaded = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "max_depth = \"deep\"").unwrap();

        let err = ClientConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AmxError::Config(_)));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Info.to_tracing_level(), tracing::Level::INFO);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
