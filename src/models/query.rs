//! Request and response models for question answering.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One result row: column name → value, in result column order.
pub type Row = serde_json::Map<String, JsonValue>;

/// Body of `POST /query`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Missing and empty are treated the same.
    #[serde(default)]
    pub question: String,
}

impl QueryRequest {
    /// True when there is nothing to ask.
    pub fn is_blank(&self) -> bool {
        self.question.trim().is_empty()
    }
}

/// The response envelope.
///
/// Either `{success: true, question, sql, results, row_count}` or
/// `{success: false, question, error}`. `row_count` always equals
/// `results.len()`, so the fields are only settable through the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskOutcome {
    success: bool,
    question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<Vec<Row>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AskOutcome {
    pub fn succeeded(question: impl Into<String>, sql: impl Into<String>, results: Vec<Row>) -> Self {
        Self {
            success: true,
            question: question.into(),
            sql: Some(sql.into()),
            row_count: Some(results.len()),
            results: Some(results),
            error: None,
        }
    }

    pub fn failed(question: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            question: question.into(),
            sql: None,
            results: None,
            row_count: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn results(&self) -> &[Row] {
        self.results.as_deref().unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.row_count.unwrap_or(0)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
