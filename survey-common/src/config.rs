//! Configuration loading
//!
//! Bootstrap configuration only; nothing here changes while the service
//! runs. Each setting is resolved in priority order:
//! 1. Command-line argument or its environment variable (`ConfigOverrides`)
//! 2. TOML config file
//! 3. Compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Where responses are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite document table
    Sqlite,
    /// JSON-lines flat file
    File,
    /// Process memory (lost on exit)
    Memory,
}

impl FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}' (expected sqlite, file or memory)",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::File => "file",
            StorageBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Contents of the TOML config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    #[serde(default)]
    pub storage: StorageToml,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[storage]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageToml {
    pub backend: Option<StorageBackend>,
    pub database_path: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
}

/// Values supplied on the command line (or via their environment variables)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub storage: Option<StorageBackend>,
    pub database_path: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Compiled defaults used when neither overrides nor the config file set a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub backend: StorageBackend,
    pub data_folder: PathBuf,
    pub static_dir: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            backend: StorageBackend::Sqlite,
            data_folder: default_data_folder(),
            static_dir: PathBuf::from("public"),
            log_level: "info".to_string(),
        }
    }
}

/// Resolved storage settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_path: PathBuf,
    pub data_file: PathBuf,
}

impl StorageConfig {
    /// Location of the active backend, for log output
    pub fn location(&self) -> String {
        match self.backend {
            StorageBackend::Sqlite => self.database_path.display().to_string(),
            StorageBackend::File => self.data_file.display().to_string(),
            StorageBackend::Memory => "(in-memory)".to_string(),
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub storage: StorageConfig,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve configuration from overrides, the config file and defaults
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let toml = load_config_file(overrides.config_file.as_deref())?;
        Ok(Self::merge(overrides, toml, CompiledDefaults::for_current_platform()))
    }

    /// Merge already-loaded sources; first `Some` wins
    pub fn merge(overrides: ConfigOverrides, toml: TomlConfig, defaults: CompiledDefaults) -> Self {
        let data_folder = defaults.data_folder;
        Self {
            host: overrides.host.or(toml.host).unwrap_or(defaults.host),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            static_dir: overrides
                .static_dir
                .or(toml.static_dir)
                .unwrap_or(defaults.static_dir),
            storage: StorageConfig {
                backend: overrides
                    .storage
                    .or(toml.storage.backend)
                    .unwrap_or(defaults.backend),
                database_path: overrides
                    .database_path
                    .or(toml.storage.database_path)
                    .unwrap_or_else(|| data_folder.join("survey.db")),
                data_file: overrides
                    .data_file
                    .or(toml.storage.data_file)
                    .unwrap_or_else(|| data_folder.join("responses.jsonl")),
            },
            log_level: overrides
                .log_level
                .or(toml.logging.level)
                .unwrap_or(defaults.log_level),
        }
    }

    /// Socket address text for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the TOML config file
///
/// An explicit path must exist. Without one, the platform default
/// location is tried and a missing file there falls back to defaults.
pub fn load_config_file(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                warn!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = parse_config(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Parse TOML config text
pub fn parse_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Platform config file location (`<config_dir>/survey/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("survey").join("config.toml"))
}

/// Platform data folder (`<data_local_dir>/survey`)
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("survey"))
        .unwrap_or_else(|| PathBuf::from("./survey_data"))
}
