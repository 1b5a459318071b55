//! Model server client: the trait the agent drives, plus the wire types.

pub mod http;
pub mod ollama;

pub use ollama::OllamaClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::tools::format::ToolSpec;
use crate::types::ChatMessage;

/// Client for a chat-completions model server.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Run one complete (non-streamed) chat exchange.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
}

/// One chat exchange request. Serializes verbatim as the request body of the
/// native chat endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec>>,
    pub stream: bool,
    pub keep_alive: KeepAlive,
}

impl ChatRequest {
    /// Non-streamed request keeping the model resident between calls.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            stream: false,
            keep_alive: KeepAlive::Indefinite,
        }
    }

    pub fn with_tools(mut self, tools: Option<Vec<ToolSpec>>) -> Self {
        self.tools = tools;
        self
    }
}

/// How long the server keeps the model loaded after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAlive {
    /// Never unload between calls.
    Indefinite,
    /// Unload after this many seconds idle.
    Seconds(u64),
}

impl Serialize for KeepAlive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Indefinite => serializer.serialize_i64(-1),
            Self::Seconds(secs) => serializer.serialize_u64(*secs),
        }
    }
}

/// Completed chat exchange returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub total_duration: Option<u64>,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl ChatResponse {
    /// Response carrying only a message, with no generation metadata.
    pub fn from_message(message: ChatMessage) -> Self {
        Self {
            message,
            done_reason: None,
            total_duration: None,
            prompt_eval_count: None,
            eval_count: None,
        }
    }
}
