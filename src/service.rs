//! Question answering pipeline.
//!
//! [`AskService`] owns the schema snapshot and the two external capabilities
//! (completion and SQL execution). It is built once at startup and shared by
//! all requests; nothing in it changes after construction.

use crate::db::SqlRunner;
use crate::error::{ServiceError, ServiceResult};
use crate::llm::{CompletionClient, Prompt, PromptBuilder, strip_code_fence};
use crate::models::{AskOutcome, Row, SchemaSnapshot};
use std::sync::Arc;
use tracing::{error, info};

pub struct AskService {
    schema: Arc<SchemaSnapshot>,
    prompts: PromptBuilder,
    llm: Arc<dyn CompletionClient>,
    runner: Arc<dyn SqlRunner>,
}

impl AskService {
    pub fn new(
        schema: SchemaSnapshot,
        prompts: PromptBuilder,
        llm: Arc<dyn CompletionClient>,
        runner: Arc<dyn SqlRunner>,
    ) -> Self {
        Self {
            schema: Arc::new(schema),
            prompts,
            llm,
            runner,
        }
    }

    pub fn prompt_for(&self, question: &str) -> Prompt {
        self.prompts.build(&self.schema, question)
    }

    /// Ask the model for SQL answering `question`.
    ///
    /// Returns the fence-stripped text, which may be empty.
    pub async fn generate_sql(&self, question: &str) -> ServiceResult<String> {
        let prompt = self.prompt_for(question);
        let raw = self.llm.complete(&prompt).await?;
        Ok(strip_code_fence(&raw))
    }

    pub async fn run_sql(&self, sql: &str) -> ServiceResult<Vec<Row>> {
        self.runner.run_sql(sql).await
    }

    /// Generate, then execute. Every failure becomes a `success: false` outcome.
    pub async fn ask(&self, question: &str) -> AskOutcome {
        info!(question = %question, "Question received");

        match self.answer(question).await {
            Ok((sql, rows)) => {
                info!(rows = rows.len(), "Question answered");
                AskOutcome::succeeded(question, sql, rows)
            }
            Err(e) => {
                error!(error = %e, sql_state = ?e.sql_state(), "Question failed");
                AskOutcome::failed(question, e.to_string())
            }
        }
    }

    async fn answer(&self, question: &str) -> ServiceResult<(String, Vec<Row>)> {
        let sql = self.generate_sql(question).await?;
        if sql.is_empty() {
            return Err(ServiceError::EmptyGeneration);
        }
        info!(sql = %sql, "SQL generated");

        let rows = self.run_sql(&sql).await?;
        Ok((sql, rows))
    }
}
