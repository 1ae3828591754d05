//! Configuration loading
//!
//! Resolution priority:
//! 1. Command-line argument (applied by the binary after loading)
//! 2. Environment variable (`JTS_*`)
//! 3. TOML config file
//! 4. Compiled default

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "JTS_CONFIG";

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Catalog sources and load-run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Run the loader at startup
    pub loader_enabled: bool,
    /// Classification structure CSV
    pub classification_path: PathBuf,
    /// Classification elements CSV (example job titles)
    pub elements_path: PathBuf,
    /// Entries per indexing batch
    pub batch_size: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            loader_enabled: true,
            classification_path: PathBuf::from(
                "data/noc_2021_version_1.0_classification_structure.csv",
            ),
            elements_path: PathBuf::from("data/noc_2021_version_1.0_elements.csv"),
            batch_size: 500,
        }
    }
}

/// Relevance tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub title_boost: f32,
    pub description_boost: f32,
    /// Minimum-match expression, e.g. `2<-1 5<-2 6<90%`
    pub minimum_match: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_boost: 3.0,
            description_boost: 1.0,
            minimum_match: "2<-1 5<-2 6<90%".to_string(),
        }
    }
}

/// Result cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached responses
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Document persistence settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file; documents are kept in memory only when unset
    pub database_path: Option<PathBuf>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML (if any) and apply environment overrides
    ///
    /// An explicitly named config file (argument or `JTS_CONFIG`) must exist; the
    /// platform default location is optional.
    pub fn load(cli_config: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(cli_config)? {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                load_toml_config(&path)?
            }
            None => {
                tracing::info!("No config file found, using defaults");
                AppConfig::default()
            }
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `JTS_*` environment variables on top of file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(host) = env_value("JTS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_value("JTS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid JTS_PORT: {}", port)))?;
        }
        if let Some(enabled) = env_value("JTS_LOADER_ENABLED") {
            self.data.loader_enabled = parse_bool(&enabled).ok_or_else(|| {
                Error::Config(format!("Invalid JTS_LOADER_ENABLED: {}", enabled))
            })?;
        }
        if let Some(path) = env_value("JTS_CLASSIFICATION_PATH") {
            self.data.classification_path = PathBuf::from(path);
        }
        if let Some(path) = env_value("JTS_ELEMENTS_PATH") {
            self.data.elements_path = PathBuf::from(path);
        }
        if let Some(path) = env_value("JTS_DATABASE_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }
        if let Some(level) = env_value("JTS_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<()> {
        if self.data.batch_size == 0 {
            return Err(Error::Config("data.batch_size must be positive".to_string()));
        }
        if self.cache.capacity == 0 {
            return Err(Error::Config("cache.capacity must be positive".to_string()));
        }
        if !(self.search.title_boost > 0.0 && self.search.description_boost > 0.0) {
            return Err(Error::Config("search boosts must be positive".to_string()));
        }
        Ok(())
    }
}

/// Locate the TOML config file
///
/// Priority: explicit argument, then `JTS_CONFIG`, then `<config_dir>/jts/config.toml`,
/// then `/etc/jts/config.toml` on Linux.
pub fn resolve_config_path(cli_config: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = cli_config {
        return require_exists(path.to_path_buf()).map(Some);
    }

    if let Some(path) = env_value(CONFIG_ENV_VAR) {
        return require_exists(PathBuf::from(path)).map(Some);
    }

    let user_config = dirs::config_dir().map(|d| d.join("jts").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/jts/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }
    }

    Ok(None)
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

fn require_exists(path: PathBuf) -> Result<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )))
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
