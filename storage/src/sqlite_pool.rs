//! SQLite connection pool wrapper for the storage crate.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Manages a single SQLite pool. `new` creates the DB file if missing; `new_read_only` never does.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (`sqlite:path.db`, a bare path, or `sqlite::memory:`).
    ///
    /// In-memory databases use a single connection so every query sees the same database.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url = %database_url, "Initializing SQLite pool");

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        Self::connect(database_url, options).await
    }

    /// Opens an existing database without write access. Fails if the file does not exist.
    pub async fn new_read_only(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url = %database_url, "Opening SQLite pool read-only");

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(false)
            .read_only(true);
        Self::connect(database_url, options).await
    }

    async fn connect(database_url: &str, options: SqliteConnectOptions) -> Result<Self, sqlx::Error> {
        let in_memory = database_url.contains(":memory:");

        let mut pool_options = SqlitePoolOptions::new().max_connections(5);
        if in_memory {
            // The database lives only as long as its connection.
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes all pooled connections; used at process shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
