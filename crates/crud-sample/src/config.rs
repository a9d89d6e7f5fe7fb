//! # Configuration
//!
//! `AppConfig` is read from a YAML file and then overridden from the environment:
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:8080
//! paging:
//!   default-page-size: 20
//!   max-page-size: 100
//! logging:
//!   enabled: true
//!   duration: true
//!   log-level: DEBUG
//!   error-log-level: WARN
//!   trim-length: 100
//! ```
//!
//! The file is named by `CRUD_SAMPLE_CONFIG` (default `application.yaml`); a
//! missing file means defaults. `CRUD_SAMPLE_BIND` replaces `server.bind`.

use crud_framework::PagingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CRUD_SAMPLE_CONFIG";
pub const BIND_ENV: &str = "CRUD_SAMPLE_BIND";
pub const DEFAULT_CONFIG_FILE: &str = "application.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paging: PagingConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            paging: PagingConfig::new(20, 100),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Settings of the request logging middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Record the handling time in milliseconds.
    pub duration: bool,
    pub log_level: LogLevel,
    /// Level for 4xx/5xx answers; `NONE` keeps them out of the log.
    pub error_log_level: LogLevel,
    /// Longer request URIs are cut to this many characters.
    pub trim_length: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: true,
            log_level: LogLevel::Debug,
            error_log_level: LogLevel::Warn,
            trim_length: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    None,
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Read the file named by [`CONFIG_ENV`] and apply [`BIND_ENV`].
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::load_from(Path::new(&path))?;
        if let Ok(bind) = std::env::var(BIND_ENV) {
            config.server.bind = bind;
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
