use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("LISTEN_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Postgres connection string. Books are kept in memory when unset.
    pub database_url: Option<String>,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Read `DATABASE_URL` and `LISTEN_ADDR` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(listen_addr))?;

        Ok(Config {
            database_url,
            listen_addr,
        })
    }
}
