//! Server configuration.
//!
//! Built once in `main` and handed to [`AppState`](crate::AppState) and
//! [`DbConfig`]. Nothing below the handlers reads configuration on its own.
//!
//! ## Sources (later wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults                 bind_addr = "127.0.0.1:8000" ...           │
//! │  2. stockroom.toml           optional, working directory                │
//! │  3. STOCKROOM_* variables    STOCKROOM_JWT_SECRET=...                   │
//! │                              STOCKROOM_CORS_ORIGINS=http://a,http://b   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use stockroom_db::DbConfig;

/// Development signing key. `main` warns when it is still in use.
pub const DEV_JWT_SECRET: &str = "stockroom-dev-secret-change-in-production";

/// Stockroom server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// HS256 signing key for access tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime in seconds (default: 8 days)
    #[serde(default = "default_access_token_lifetime_secs")]
    pub access_token_lifetime_secs: i64,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./stockroom.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_access_token_lifetime_secs() -> i64 {
    60 * 60 * 24 * 8
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: default_bind_addr(),
            database_path: default_database_path(),
            max_connections: default_max_connections(),
            jwt_secret: default_jwt_secret(),
            access_token_lifetime_secs: default_access_token_lifetime_secs(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `stockroom.toml` (optional) and `STOCKROOM_*`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("stockroom").required(false))
            .add_source(
                Environment::with_prefix("STOCKROOM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if self.jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue("jwt_secret".to_string()));
        }
        if self.access_token_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "access_token_lifetime_secs".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidValue("bind_addr".to_string()))
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}
