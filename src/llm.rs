use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("chat request failed: {0}")]
    Request(reqwest::Error),
    #[error("chat API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to deserialize chat response: {0}")]
    Deserialization(reqwest::Error),
    #[error("chat response had no content")]
    EmptyResponse,
    #[error("chat API key is missing")]
    MissingApiKey,
}

/// A chat-completion backend: one system prompt, one user message, one reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize, Debug)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// [`ChatModel`] over an OpenAI-compatible `chat/completions` endpoint.
///
/// Each request is bounded by the configured timeout and retried
/// `retries` times before the error is returned.
#[derive(Clone, Debug)]
pub struct OpenAiChatModel {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    retries: u32,
}

impl OpenAiChatModel {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            client,
            api_url: config.api_url.to_owned(),
            api_key: config.api_key.to_owned(),
            model: config.model.to_owned(),
            temperature: config.temperature,
            retries: config.retries,
        })
    }

    async fn send(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        let request_body = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(LlmError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(LlmError::Deserialization)?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let mut attempt = 0;
        loop {
            match self.send(system, user).await {
                Ok(content) => return Ok(content),
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(error = %err, attempt, "Chat request failed, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }
}
