//! Raw SQL execution.
//!
//! Generated SQL is executed exactly as produced: no parameters, no row limit,
//! no timeout and no statement filtering. All rows are materialized before
//! returning, so a failure part way through yields no partial result.

use crate::db::pool::DbPool;
use crate::db::types::RowToJson;
use crate::error::{ServiceError, ServiceResult};
use crate::models::Row;
use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

/// Something that can run a SQL string and hand back its rows.
#[async_trait]
pub trait SqlRunner: Send + Sync {
    async fn run_sql(&self, sql: &str) -> ServiceResult<Vec<Row>>;
}

/// Query executor backed by the live connection pool.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    pool: DbPool,
}

impl QueryExecutor {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Execute `sql` and return every row in result order.
    pub async fn execute(&self, sql: &str) -> ServiceResult<Vec<Row>> {
        let start = Instant::now();
        debug!(sql = %sql, "Executing query");

        let rows = match &self.pool {
            DbPool::Postgres(p) => postgres::fetch_rows(p, sql).await?,
            DbPool::SQLite(p) => sqlite::fetch_rows(p, sql).await?,
        };

        debug!(
            rows = rows.len(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Query finished"
        );
        Ok(rows)
    }
}

#[async_trait]
impl SqlRunner for QueryExecutor {
    async fn run_sql(&self, sql: &str) -> ServiceResult<Vec<Row>> {
        self.execute(sql).await
    }
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================
//
// Raw SQL (no arguments) goes over the simple query protocol, so statements
// that cannot be prepared still run.

mod postgres {
    use super::*;
    use sqlx::{Executor, PgPool};

    pub async fn fetch_rows(pool: &PgPool, sql: &str) -> ServiceResult<Vec<Row>> {
        let rows = pool.fetch_all(sql).await.map_err(ServiceError::from)?;
        Ok(rows.iter().map(RowToJson::to_json_map).collect())
    }
}

mod sqlite {
    use super::*;
    use sqlx::{Executor, SqlitePool};

    pub async fn fetch_rows(pool: &SqlitePool, sql: &str) -> ServiceResult<Vec<Row>> {
        let rows = pool.fetch_all(sql).await.map_err(ServiceError::from)?;
        Ok(rows.iter().map(RowToJson::to_json_map).collect())
    }
}
