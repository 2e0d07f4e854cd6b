//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file whose path is read from
//! `COUNTRY_API_CONFIG`. Every section may be omitted. `COUNTRY_API_BIND` and
//! `DATABASE_URL` override the bind address and the storage url.

use crate::core::error::ConfigError;
use crate::core::repository::RepositoryConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Environment variable holding the config file path
pub const CONFIG_PATH_ENV: &str = "COUNTRY_API_CONFIG";
/// Environment variable overriding `server.bind_addr`
pub const BIND_ENV: &str = "COUNTRY_API_BIND";
/// Environment variable overriding `storage.url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_SQLITE_URL: &str = "sqlite://database.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub repository: RepositoryConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to (e.g., "127.0.0.1:5000")
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl ServerConfig {
    /// Parse `bind_addr` into a socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                field: "server.bind_addr".to_string(),
                value: self.bind_addr.clone(),
                message: e.to_string(),
            })
    }
}

/// Storage backend selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    InMemory,
    #[default]
    Sqlite,
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::InMemory => "in_memory",
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Postgres => "postgres",
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Connection url; SQLite falls back to a local `database.db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Pool size for SQL backends
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl StorageConfig {
    /// Connection url for the selected backend
    pub fn url(&self) -> Result<String, ConfigError> {
        match (&self.url, self.backend) {
            (Some(url), _) => Ok(url.clone()),
            (None, StorageBackend::Sqlite) => Ok(DEFAULT_SQLITE_URL.to_string()),
            (None, StorageBackend::InMemory) => Ok(String::new()),
            (None, StorageBackend::Postgres) => Err(ConfigError::InvalidValue {
                field: "storage.url".to_string(),
                value: String::new(),
                message: format!(
                    "postgres backend needs a url (set it in the file or via {})",
                    DATABASE_URL_ENV
                ),
            }),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: display.clone(),
            },
            _ => ConfigError::from(e),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            file: Some(display),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides looked up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_addr) = lookup(BIND_ENV).filter(|v| !v.is_empty()) {
            self.server.bind_addr = bind_addr;
        }
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.storage.url = Some(url);
        }
    }

    /// Apply `COUNTRY_API_BIND` and `DATABASE_URL` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Load the file named by `COUNTRY_API_CONFIG` (defaults when unset),
    /// then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => {
                tracing::info!(path = %path, "loading configuration file");
                Self::from_yaml_file(path)?
            }
            _ => {
                tracing::info!("no configuration file, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.server.socket_addr()?;

        Ok(config)
    }
}
