//! Client for an Ollama-compatible model server, speaking the native
//! `/api/chat` protocol.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ChatError;

use super::http::{body_to_error, shared_client};
use super::{ChatClient, ChatRequest, ChatResponse};

/// Server address used when `OLLAMA_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Build a client from the environment: honors `OLLAMA_BASE_URL` (a
    /// `.env` file is read when present), defaulting to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base_url =
            std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "sending chat request"
        );

        let response = shared_client().post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(body_to_error(status.as_u16(), &body));
        }

        let completed: ChatResponse = response.json().await?;
        debug!(
            done_reason = completed.done_reason.as_deref().unwrap_or("stop"),
            prompt_eval_count = ?completed.prompt_eval_count,
            eval_count = ?completed.eval_count,
            "chat response received"
        );
        Ok(completed)
    }
}
