//! askdb library
//!
//! Answers natural-language questions about a SQL database: the question and
//! a snapshot of the schema go to a language model, the SQL it returns is run
//! against the database, and the rows come back as JSON.

pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod models;
pub mod service;
pub mod transport;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use service::AskService;
