//! Error types for askdb.
//!
//! This module defines all error types using `thiserror`. The display strings of
//! the generation and execution variants are surfaced verbatim to HTTP callers
//! in the `error` / `detail` fields, so they are written for humans.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Schema introspection failed: {message}")]
    SchemaIntrospection { message: String },

    #[error("SQL generation failed: {message}")]
    Generation { message: String },

    #[error("Could not generate SQL")]
    EmptyGeneration,

    #[error("SQL execution failed: {message}")]
    Execution {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    /// Displayed bare: the message is the caller-facing detail.
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ServiceError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a schema introspection error.
    pub fn schema_introspection(message: impl Into<String>) -> Self {
        Self::SchemaIntrospection {
            message: message.into(),
        }
    }

    /// Create a generation error.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create an execution error with optional SQL state.
    pub fn execution(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Execution {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// SQLSTATE reported by the database, if any.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Execution { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }

    /// Whether the caller supplied bad input (as opposed to a server-side failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

/// Convert sqlx errors raised while running generated SQL.
///
/// Schema capture maps its own failures to `SchemaIntrospection` explicitly;
/// everything that reaches this conversion is an execution failure.
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                ServiceError::execution(db_err.message(), code)
            }
            sqlx::Error::Configuration(msg) => {
                ServiceError::execution(format!("invalid connection configuration: {}", msg), None)
            }
            sqlx::Error::Io(io_err) => ServiceError::execution(format!("I/O error: {}", io_err), None),
            sqlx::Error::Tls(tls_err) => {
                ServiceError::execution(format!("TLS error: {}", tls_err), None)
            }
            sqlx::Error::Protocol(msg) => {
                ServiceError::execution(format!("protocol error: {}", msg), None)
            }
            sqlx::Error::PoolTimedOut => {
                ServiceError::execution("timed out acquiring a database connection", None)
            }
            sqlx::Error::PoolClosed => ServiceError::execution("connection pool is closed", None),
            sqlx::Error::ColumnDecode { index, source } => {
                ServiceError::execution(format!("failed to decode column {}: {}", index, source), None)
            }
            other => ServiceError::execution(other.to_string(), None),
        }
    }
}

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
