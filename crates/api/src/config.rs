//! Layered Application Configuration
//!
//! Defaults, then an optional TOML/JSON/YAML file, then `DIAGNOSIS__*`
//! environment variables (e.g. `DIAGNOSIS__SERVER__BIND_ADDR`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_NAME: &str = "diagnosis";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DIAGNOSIS";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Diagnosis history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether completed diagnoses are persisted
    pub enabled: bool,
    /// JSON log file
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(history::DEFAULT_HISTORY_PATH),
        }
    }
}

/// Rule table source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Replacement rule document; the built-in table is used when unset
    pub path: Option<PathBuf>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    pub knowledge_base: KnowledgeBaseConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; otherwise `diagnosis.{toml,json,yaml}`
    /// in the working directory is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_defaults(path, &[])
    }

    /// Load configuration with extra `(key, value)` defaults, e.g.
    /// `("log.level", "warn")`. File and environment values still win.
    pub fn load_with_defaults(path: Option<&Path>, defaults: &[(&str, &str)]) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let mut builder = config::Config::builder();
        for (key, value) in defaults {
            builder = builder.set_default(*key, *value)?;
        }

        let settings = builder
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:5000");
        assert!(config.history.enabled);
        assert_eq!(config.history.path, PathBuf::from("diagnosis_history.json"));
        assert!(config.knowledge_base.path.is_none());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nbind_addr = \"127.0.0.1:8080\"\n\n[history]\nenabled = false\n"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert!(!config.history.enabled);
        // Untouched sections keep their defaults
        assert_eq!(config.log.level, "info");
        assert_eq!(config.history.path, PathBuf::from("diagnosis_history.json"));
    }

    #[test]
    fn test_extra_defaults_yield_to_file() {
        let mut quiet = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(quiet, "[history]\nenabled = false\n").unwrap();
        let config = AppConfig::load_with_defaults(Some(quiet.path()), &[("log.level", "warn")]).unwrap();
        assert_eq!(config.log.level, "warn");
        assert!(!config.history.enabled);

        let mut chatty = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(chatty, "[log]\nlevel = \"trace\"\n").unwrap();
        let config = AppConfig::load_with_defaults(Some(chatty.path()), &[("log.level", "warn")]).unwrap();
        assert_eq!(config.log.level, "trace");
        assert!(!config.log.json);
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/diagnosis.toml"))).is_err());
    }
}
