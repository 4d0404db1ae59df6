//! Database access layer.
//!
//! This module provides database access functionality:
//! - Connection pool management
//! - Schema snapshot capture
//! - Raw SQL execution
//! - Row to JSON conversion

pub mod executor;
pub mod pool;
pub mod schema;
pub mod types;

pub use executor::{QueryExecutor, SqlRunner};
pub use pool::DbPool;
pub use schema::SchemaInspector;
