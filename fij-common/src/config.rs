//! Configuration loading and data folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (clap reads these alongside the flags)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::auth::AuthMode;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Database file name inside the data folder
pub const DATABASE_FILE_NAME: &str = "journal.db";

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5780";

/// Settings read from the TOML config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub data_folder: Option<PathBuf>,
    pub bind: Option<String>,
    pub password: Option<String>,
    pub secure_cookies: Option<bool>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub data_folder: Option<PathBuf>,
    pub bind: Option<String>,
    pub password: Option<String>,
    pub secure_cookies: Option<bool>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub data_folder: PathBuf,
    pub bind_addr: String,
    pub auth: AuthMode,
    pub secure_cookies: bool,
}

impl JournalConfig {
    /// Resolve configuration from overrides plus the TOML file
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let file_path = overrides.config_file.clone().or_else(default_config_file);
        let file = match file_path {
            Some(path) => load_toml_config(&path)?,
            None => TomlConfig::default(),
        };

        Ok(Self::merge(overrides, file))
    }

    /// Merge overrides over file values over compiled defaults
    pub fn merge(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        let data_folder = overrides
            .data_folder
            .or(file.data_folder)
            .unwrap_or_else(default_data_folder);

        let bind_addr = overrides
            .bind
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let password = overrides.password.or(file.password);

        let secure_cookies = overrides
            .secure_cookies
            .or(file.secure_cookies)
            .unwrap_or(false);

        Self {
            data_folder,
            bind_addr,
            auth: AuthMode::from_password(password.as_deref()),
            secure_cookies,
        }
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_folder.join(DATABASE_FILE_NAME)
    }
}

/// Load the TOML config file
///
/// A missing file yields defaults; a file that exists but does not parse is an
/// error, so a typo never silently disables the password.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        info!("No config file at {} - using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content).map_err(|e| {
        warn!("Failed to parse config file {}: {}", path.display(), e);
        Error::Config(format!("Invalid config file {}: {}", path.display(), e))
    })?;

    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Default config file location for the platform
fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fi-journal").join("config.toml"))
}

/// OS-dependent default data folder
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fi-journal"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}
