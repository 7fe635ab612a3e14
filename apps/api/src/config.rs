//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable             | Default            |
//! |----------------------|--------------------|
//! | `HTTP_HOST`          | `0.0.0.0`          |
//! | `HTTP_PORT`          | `8000`             |
//! | `DATABASE_PATH`      | `./digicheese.db`  |
//! | `DB_MAX_CONNECTIONS` | `5`                |
//! | `DEFAULT_PAGE_LIMIT` | `10`               |
//! | `MAX_PAGE_LIMIT`     | `100`              |
//! | `LOG_LEVEL`          | `info`             |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use digicheese_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite file path (`:memory:` for a throwaway database)
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// `limit` used when a list request doesn't send one
    pub default_page_limit: u32,

    /// Largest accepted `limit`
    pub max_page_limit: u32,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            database_path: "./digicheese.db".to_string(),
            db_max_connections: 5,
            default_page_limit: 10,
            max_page_limit: 100,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            host: parse_or(&lookup, "HTTP_HOST", defaults.host)?,
            port: parse_or(&lookup, "HTTP_PORT", defaults.port)?,
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            default_page_limit: parse_or(&lookup, "DEFAULT_PAGE_LIMIT", defaults.default_page_limit)?,
            max_page_limit: parse_or(&lookup, "MAX_PAGE_LIMIT", defaults.max_page_limit)?,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        if config.max_page_limit == 0 {
            return Err(ConfigError::InvalidValue("MAX_PAGE_LIMIT".to_string()));
        }

        if config.default_page_limit == 0 || config.default_page_limit > config.max_page_limit {
            return Err(ConfigError::DefaultLimitOutOfRange {
                default: config.default_page_limit,
                max: config.max_page_limit,
            });
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("DEFAULT_PAGE_LIMIT ({default}) must be between 1 and MAX_PAGE_LIMIT ({max})")]
    DefaultLimitOutOfRange { default: u32, max: u32 },
}
