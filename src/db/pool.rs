//! Connection pool management.
//!
//! Pools connect lazily: no connection is opened until the first query, so an
//! unreachable database at startup surfaces as a failed schema capture rather
//! than a failed boot.

use crate::config::DatabaseConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::DatabaseType;
use sqlx::{
    PgPool, SqlitePool, postgres::PgConnectOptions, postgres::PgPoolOptions,
    sqlite::SqliteConnectOptions, sqlite::SqlitePoolOptions,
};
use std::str::FromStr;
use tracing::{debug, info};

/// Database-specific connection pool (avoids AnyPool limitations).
#[derive(Debug, Clone)]
pub enum DbPool {
    Postgres(PgPool),
    SQLite(SqlitePool),
}

impl DbPool {
    /// Build a lazily-connecting pool for the configured database.
    pub fn connect_lazy(config: &DatabaseConfig) -> ServiceResult<Self> {
        debug!(
            db_type = %config.db_type,
            max_connections = config.max_connections,
            "Creating connection pool"
        );

        let pool = match config.db_type {
            DatabaseType::PostgreSQL => {
                let options = PgConnectOptions::from_str(&config.connection_string)
                    .map_err(|e| ServiceError::configuration(format!("Invalid PostgreSQL URL: {e}")))?;
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect_lazy_with(options);
                DbPool::Postgres(pool)
            }
            DatabaseType::SQLite => {
                let options = SqliteConnectOptions::from_str(&config.connection_string)
                    .map_err(|e| ServiceError::configuration(format!("Invalid SQLite URL: {e}")))?;
                // An in-memory database lives exactly as long as its connection.
                let pool = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_lazy_with(options);
                DbPool::SQLite(pool)
            }
        };

        info!(
            db_type = %config.db_type,
            url = %config.masked_connection_string(),
            "Connection pool ready"
        );
        Ok(pool)
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        match self {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::SQLite(pool) => pool.close().await,
        }
    }

    /// Get the database type for this pool.
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DbPool::Postgres(_) => DatabaseType::PostgreSQL,
            DbPool::SQLite(_) => DatabaseType::SQLite,
        }
    }
}
