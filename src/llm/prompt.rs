//! Prompt construction.
//!
//! Rendering is a pure function of the schema snapshot, the SQL dialect and
//! the question: no I/O, same input gives the same prompt.

use crate::models::{DatabaseType, SchemaSnapshot};
use serde::Serialize;
use std::fmt::Write as _;

/// The system + user message pair sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    dialect: DatabaseType,
}

impl PromptBuilder {
    pub fn new(dialect: DatabaseType) -> Self {
        Self { dialect }
    }

    pub fn build(&self, schema: &SchemaSnapshot, question: &str) -> Prompt {
        let dialect = self.dialect.display_name();
        let system = format!("You are a {dialect} expert. Return only SQL queries.");

        let mut user = self.schema_context(schema);
        let _ = write!(
            user,
            "\nUser Question: {question}\n\nGenerate {dialect} query. Return ONLY the SQL."
        );

        Prompt { system, user }
    }

    /// Schema description followed by the fixed formatting rules.
    pub fn schema_context(&self, schema: &SchemaSnapshot) -> String {
        let mut context = format!("{} Database Schema:\n\n", self.dialect.display_name());

        for (table, columns) in schema.iter() {
            let _ = writeln!(context, "Table: \"{table}\"");
            context.push_str("Columns:\n");
            for column in columns {
                let _ = writeln!(context, "  - {column}");
            }
            context.push('\n');
        }

        context.push_str("Rules:\n1. Use double quotes for names\n2. Return only SQL\n");
        context
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DatabaseType::PostgreSQL)
    }
}
