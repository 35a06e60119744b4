use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const ENV_HOST: &str = "GOLF_HOST";
const ENV_PORT: &str = "GOLF_PORT";
const ENV_DATABASE_PATH: &str = "GOLF_DATABASE_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid port: {value}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{host}:{port} is not a valid listen address")]
    InvalidAddress { host: String, port: u16 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`)
    pub host: String,
    /// Port to bind (default `3333`)
    pub port: u16,
    /// SQLite file holding users, courses and rounds
    pub database_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3333,
            database_path: PathBuf::from("golf.db"),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `GOLF_HOST`, `GOLF_PORT` and `GOLF_DATABASE_PATH`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
                name: ENV_PORT,
                value: port,
            })?;
        }

        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            config.database_path = PathBuf::from(path);
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }
}
