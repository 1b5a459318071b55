//! Convenience re-exports for common use.

pub use crate::agent::{ConversationAgent, MAX_TOOL_ITERATIONS};
pub use crate::config::{AgentConfig, AgentOptions};
pub use crate::error::{ChatError, TemplateError, ToolError, TurnError};
pub use crate::history::{HistoryStore, MessageHistory, DEFAULT_HISTORY_TTL};
pub use crate::identity::UserLookup;
pub use crate::prompt::{PromptRenderer, PromptVars, TemplateRenderer};
pub use crate::provider::{ChatClient, ChatRequest, ChatResponse, KeepAlive, OllamaClient};
pub use crate::tools::{ToolContext, ToolDescriptor, ToolInput, ToolRegistry, ToolSession};
pub use crate::types::{
    ChatMessage, ErrorCode, Role, ToolCall, TurnContext, TurnRequest, TurnResponse, TurnResult,
};
