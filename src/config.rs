//! Configuration system for the Startup Simulator
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (SIMULATOR_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::CatalogSource;
use crate::error::{Error, Result};
use crate::store::StorageBackend;
use crate::types::Role;

/// Main simulator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Scenario and archetype definitions
    pub catalog: CatalogSettings,

    /// Which roles may start sessions
    pub policy: PolicySettings,

    /// Session persistence
    pub storage: StorageSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Catalog data settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory holding `scenarios/<role>.json` and `archetypes/<role>.json`.
    /// Unset means the definitions bundled with the binary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

/// Role gating policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Roles allowed to create sessions
    pub enabled_roles: Vec<String>,
}

/// Session storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage backend: memory, file
    pub backend: String,

    /// Directory for session files (file backend)
    pub session_dir: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            enabled_roles: vec![Role::Engineer.slug().to_string()],
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File.name().to_string(),
            session_dir: "~/.startup-simulator/sessions".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

/// Values given on the command line, applied on top of env and file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<String>,
    pub backend: Option<String>,
}

impl SimulatorConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with(config_path, &CliOverrides::default())
    }

    /// Load configuration, then apply CLI overrides before validating
    pub fn load_with(config_path: Option<&str>, overrides: &CliOverrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|source| Error::IoRead {
                path: path.clone(),
                source,
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: format!("{}: {}", path.display(), e.message()),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        config.apply_env_overrides();
        config.apply_cli_overrides(overrides);
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        let search_paths = [
            PathBuf::from("startup-simulator.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("startup-simulator").join("config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".startup-simulator").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `SIMULATOR_*` values from `lookup`
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SIMULATOR_CATALOG_DIR") {
            self.catalog.data_dir = Some(val);
        }

        // Comma-separated or JSON array, e.g. "engineer,founder" or '["engineer"]'
        if let Some(val) = lookup("SIMULATOR_ENABLED_ROLES") {
            self.policy.enabled_roles = parse_role_list(&val);
        }

        if let Some(val) = lookup("SIMULATOR_STORAGE_BACKEND") {
            self.storage.backend = val;
        }
        if let Some(val) = lookup("SIMULATOR_SESSION_DIR") {
            self.storage.session_dir = val;
        }

        if let Some(val) = lookup("SIMULATOR_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("SIMULATOR_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = lookup("SIMULATOR_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(ref dir) = overrides.data_dir {
            self.catalog.data_dir = Some(dir.clone());
        }
        if let Some(ref backend) = overrides.backend {
            self.storage.backend = backend.clone();
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.storage.session_dir = expand_path(&self.storage.session_dir);

        if let Some(ref dir) = self.catalog.data_dir {
            self.catalog.data_dir = Some(expand_path(dir));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        self.storage_backend()?;

        if self.enabled_roles()?.is_empty() {
            return Err(Error::Config(
                "policy.enabled_roles must name at least one role".to_string(),
            ));
        }

        if self.storage_backend()? == StorageBackend::File && self.storage.session_dir.trim().is_empty() {
            return Err(Error::Config(
                "storage.session_dir cannot be empty with the file backend".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed `policy.enabled_roles`
    pub fn enabled_roles(&self) -> Result<Vec<Role>> {
        self.policy
            .enabled_roles
            .iter()
            .map(|r| r.parse::<Role>().map_err(Error::Config))
            .collect()
    }

    /// Parsed `storage.backend`
    pub fn storage_backend(&self) -> Result<StorageBackend> {
        self.storage.backend.parse().map_err(Error::Config)
    }

    /// Catalog source selected by `catalog.data_dir`
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::from_data_dir(self.catalog.data_dir.as_deref())
    }

    /// Session directory as a PathBuf
    pub fn session_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.session_dir)
    }
}

/// Accept a JSON array or a comma-separated string
fn parse_role_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
            return list
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
        }
    }
    raw.split(',')
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".startup-simulator")
                .join("config.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::IoWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|source| Error::IoWrite {
        path: config_path.clone(),
        source,
    })?;

    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# Startup Simulator Configuration

[catalog]
# Directory with scenarios/<role>.json and archetypes/<role>.json.
# Comment out to use the definitions bundled with the binary.
# data_dir = "~/.startup-simulator/data"

[policy]
# Roles allowed to start sessions: engineer, product_manager, founder
enabled_roles = ["engineer"]

[storage]
# Session storage backend: memory, file
backend = "file"

# Directory for session files (file backend)
session_dir = "~/.startup-simulator/sessions"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.startup-simulator/logs/simulator.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}
