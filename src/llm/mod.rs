//! Language-model side of the pipeline.
//!
//! - `prompt`: renders a schema snapshot and a question into a [`Prompt`]
//! - `client`: OpenAI-compatible chat completions over HTTP
//! - `fence`: recovers bare SQL from markdown-wrapped completions

pub mod client;
pub mod fence;
pub mod prompt;

pub use client::ChatCompletionsClient;
pub use fence::strip_code_fence;
pub use prompt::{Prompt, PromptBuilder};

use crate::error::ServiceResult;
use async_trait::async_trait;

/// A completion capability: prompt in, raw model text out.
///
/// Implementations report every failure (transport, status, decoding) as
/// [`ServiceError::Generation`](crate::error::ServiceError::Generation).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> ServiceResult<String>;
}
