//! Application settings loaded from config.toml and the environment.
//!
//! Every field has a default, so the file is optional. `DATABASE_URL` and
//! `STUDENT_GRADES_PORT` override the file when set.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::env::VarError;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "STUDENT_GRADES_CONFIG";
/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "STUDENT_GRADES_PORT";
/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Storage settings
    pub database: DatabaseConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Directory of static web assets served at `/`
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: "web".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Storage settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SeaORM` connection URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Applies environment overrides on top of file values.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `port` is not a valid port number.
    pub fn with_overrides(mut self, database_url: Option<String>, port: Option<String>) -> Result<Self> {
        if let Some(url) = database_url {
            debug!("Database URL overridden from environment");
            self.database.url = url;
        }
        if let Some(port) = port {
            self.server.port = port.trim().parse().map_err(|e| Error::Config {
                message: format!("Invalid {PORT_ENV} value {port:?}: {e}"),
            })?;
        }
        Ok(self)
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Loads configuration from a TOML file. A missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No config file at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Reads an optional environment variable. Unset is `None`; non-Unicode is an error.
fn optional_env(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Loads the file named by [`CONFIG_PATH_ENV`] (or `config.toml`) and applies environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = optional_env(CONFIG_PATH_ENV)?.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)?.with_overrides(optional_env("DATABASE_URL")?, optional_env(PORT_ENV)?)
}
