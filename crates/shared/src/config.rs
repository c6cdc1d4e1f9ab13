//! Application configuration management.

use serde::Deserialize;
use uuid::Uuid;

use crate::defaults::{ADMIN_USER_ID, DEFAULT_BRANCH_ID, DEFAULT_FISCAL_YEAR_ID};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Fallback identifiers for requests that omit them.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Whether SQL statements are logged.
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    /// Creates a configuration for `url` with default pool settings.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Identifiers used when a request does not name a fiscal year, branch or user.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DefaultsConfig {
    /// Fiscal year for account and transaction requests.
    #[serde(default = "default_fiscal_year_id")]
    pub fiscal_year_id: Uuid,
    /// Branch for transactions, customers and suppliers.
    #[serde(default = "default_branch_id")]
    pub branch_id: Uuid,
    /// User recorded as the author of new transactions.
    #[serde(default = "default_user_id")]
    pub user_id: Uuid,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            fiscal_year_id: default_fiscal_year_id(),
            branch_id: default_branch_id(),
            user_id: default_user_id(),
        }
    }
}

fn default_fiscal_year_id() -> Uuid {
    DEFAULT_FISCAL_YEAR_ID
}

fn default_branch_id() -> Uuid {
    DEFAULT_BRANCH_ID
}

fn default_user_id() -> Uuid {
    ADMIN_USER_ID
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("QAYD").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
