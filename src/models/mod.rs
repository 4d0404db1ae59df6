//! Data models for askdb.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use connection::DatabaseType;
pub use query::{AskOutcome, QueryRequest, Row};
pub use schema::{ColumnDescriptor, SchemaSnapshot};
