//! OpenAI-compatible chat completions client.
//!
//! Works against any provider exposing `POST {base}/chat/completions` with
//! bearer authentication (Groq by default). One request per call: no retry,
//! no backoff.

use crate::config::LlmConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::llm::{CompletionClient, Prompt};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `{"error": {"message": "..."}}`, as returned on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct ChatCompletionsClient {
    config: LlmConfig,
    url: String,
    client: Client,
}

impl ChatCompletionsClient {
    pub fn new(config: LlmConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::configuration(format!("HTTP client setup failed: {e}")))?;
        let url = config.completions_url();

        Ok(Self {
            config,
            url,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, prompt: &Prompt) -> ServiceResult<String> {
        debug!(model = %self.config.model, url = %self.url, "Requesting completion");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| ServiceError::generation(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::generation(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ServiceError::generation(api_error_message(status, &body)));
        }

        parse_completion(&body)
    }
}

fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => format!("API error ({}): {}", status, parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("API error ({})", status),
        Err(_) => format!("API error ({}): {}", status, body.trim()),
    }
}

/// First choice's content; `null` content counts as an empty completion.
fn parse_completion(body: &str) -> ServiceResult<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::generation(format!("malformed response: {e}")))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::generation("malformed response: no choices returned"))?;

    Ok(choice.message.content.unwrap_or_default())
}
