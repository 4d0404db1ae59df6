//! Schema snapshot capture.
//!
//! # Architecture
//!
//! SQL queries are organized in the `queries` submodule with constants for each
//! database type. Database-specific implementations are in their respective
//! submodules (postgres, sqlite), each providing the same interface.

use crate::db::pool::DbPool;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{ColumnDescriptor, SchemaSnapshot};
use tracing::{debug, warn};

/// Schema inspector for database introspection.
pub struct SchemaInspector;

impl SchemaInspector {
    /// Capture every table of `schema` with its ordered columns.
    ///
    /// `schema` is ignored for SQLite, which has a single namespace per file.
    pub async fn capture(pool: &DbPool, schema: &str) -> ServiceResult<SchemaSnapshot> {
        let snapshot = match pool {
            DbPool::Postgres(p) => postgres::capture(p, schema).await,
            DbPool::SQLite(p) => sqlite::capture(p).await,
        }?;

        debug!(tables = snapshot.len(), "Schema snapshot captured");
        Ok(snapshot)
    }

    /// Like [`capture`](Self::capture), but a failure degrades to an empty
    /// snapshot with a warning. Not retried.
    pub async fn capture_or_empty(pool: &DbPool, schema: &str) -> SchemaSnapshot {
        match Self::capture(pool, schema).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Continuing with an empty schema snapshot");
                SchemaSnapshot::default()
            }
        }
    }
}

fn introspection_error(err: sqlx::Error) -> ServiceError {
    ServiceError::schema_introspection(err.to_string())
}

// =============================================================================
// SQL Query Templates
// =============================================================================

mod queries {
    pub mod postgres {
        pub const LIST_TABLES: &str = r#"
            SELECT table_name::text AS table_name
            FROM information_schema.tables
            WHERE table_schema = $1
            ORDER BY table_name
            "#;

        pub const LIST_COLUMNS: &str = r#"
            SELECT
                table_name::text AS table_name,
                column_name::text AS column_name,
                data_type::text AS data_type
            FROM information_schema.columns
            WHERE table_schema = $1
            ORDER BY table_name, ordinal_position
            "#;
    }

    pub mod sqlite {
        pub const LIST_TABLES: &str = r#"
            SELECT name
            FROM sqlite_master
            WHERE type IN ('table', 'view')
            AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#;

        pub const LIST_COLUMNS: &str = r#"
            SELECT name, type
            FROM pragma_table_info(?1)
            ORDER BY cid
            "#;
    }
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================

mod postgres {
    use super::*;
    use sqlx::{PgPool, Row};
    use std::collections::HashMap;

    pub async fn capture(pool: &PgPool, schema: &str) -> ServiceResult<SchemaSnapshot> {
        let tables: Vec<String> = sqlx::query(queries::postgres::LIST_TABLES)
            .bind(schema)
            .fetch_all(pool)
            .await
            .map_err(introspection_error)?
            .iter()
            .map(|row| row.try_get::<String, _>("table_name"))
            .collect::<Result<_, _>>()
            .map_err(introspection_error)?;

        let rows = sqlx::query(queries::postgres::LIST_COLUMNS)
            .bind(schema)
            .fetch_all(pool)
            .await
            .map_err(introspection_error)?;

        let mut columns: HashMap<String, Vec<ColumnDescriptor>> = HashMap::new();
        for row in &rows {
            let table: String = row.try_get("table_name").map_err(introspection_error)?;
            let name: String = row.try_get("column_name").map_err(introspection_error)?;
            let data_type: String = row.try_get("data_type").map_err(introspection_error)?;
            columns
                .entry(table)
                .or_default()
                .push(ColumnDescriptor::new(name, data_type));
        }

        let mut snapshot = SchemaSnapshot::new();
        for table in tables {
            let cols = columns.remove(&table).unwrap_or_default();
            snapshot.insert_table(table, cols);
        }
        Ok(snapshot)
    }
}

mod sqlite {
    use super::*;
    use sqlx::{Row, SqlitePool};

    pub async fn capture(pool: &SqlitePool) -> ServiceResult<SchemaSnapshot> {
        let tables: Vec<String> = sqlx::query(queries::sqlite::LIST_TABLES)
            .fetch_all(pool)
            .await
            .map_err(introspection_error)?
            .iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<Result<_, _>>()
            .map_err(introspection_error)?;

        let mut snapshot = SchemaSnapshot::new();
        for table in tables {
            let rows = sqlx::query(queries::sqlite::LIST_COLUMNS)
                .bind(&table)
                .fetch_all(pool)
                .await
                .map_err(introspection_error)?;

            let cols = rows
                .iter()
                .map(|row| {
                    let name: String = row.try_get("name")?;
                    // Untyped columns report an empty declared type
                    let data_type: String = row.try_get("type").unwrap_or_default();
                    Ok(ColumnDescriptor::new(name, data_type))
                })
                .collect::<Result<Vec<_>, sqlx::Error>>()
                .map_err(introspection_error)?;

            snapshot.insert_table(table, cols);
        }
        Ok(snapshot)
    }
}
