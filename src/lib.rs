mod api;
mod config;
mod database;
mod error;
mod memory;
mod models;
mod repo;
mod schema;
mod validation;

use axum::{serve::Serve, Router};
use diesel_async::pooled_connection::PoolError;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use api::build_app;
pub use config::{Config, ConfigError};
pub use database::{create_db_pool, DatabaseBookRepo, DatabaseError};
pub use error::ApiError;
pub use memory::{InMemoryBookRepo, MemoryError};
pub use models::{Book, BookFilters, BookPatch};
pub use repo::BookRepo;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create DB connection pool: {0}")]
    Database(#[from] PoolError),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
}

pub async fn start_server(
    config: &Config,
) -> Result<Serve<TcpListener, Router, Router>, StartupError> {
    let router = match &config.database_url {
        Some(db_url) => build_app(DatabaseBookRepo::new(create_db_pool(db_url).await?)),
        None => {
            warn!("DATABASE_URL is not set, books will only be kept in memory");
            build_app(InMemoryBookRepo::new())
        }
    };

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.listen_addr,
            source,
        })?;
    info!("Listening on {}", config.listen_addr);

    Ok(axum::serve(listener, router))
}
