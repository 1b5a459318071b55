//! Transcript message types, shaped exactly like the model server's wire
//! format.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Message role, as written on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One model-requested tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

/// The function half of a tool call: which tool, with which arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            function: FunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }

    /// Tool name this call targets.
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Arguments the model supplied for this call.
    pub fn arguments(&self) -> &serde_json::Value {
        &self.function.arguments
    }
}

/// A single transcript message with a closed per-role shape: only assistant
/// messages may carry tool calls, and system/user/tool messages always have
/// content. Serializes tagged on `role`, matching the chat wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,
    },
    Tool {
        content: String,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Plain assistant reply with text content and no tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    /// Assistant reply as returned by the model. Empty content and empty
    /// tool-call lists are normalized to absent.
    pub fn assistant_reply(
        content: Option<String>,
        tool_calls: Option<Vec<ToolCall>>,
    ) -> Self {
        Self::Assistant {
            content: content.filter(|text| !text.is_empty()),
            tool_calls: tool_calls.filter(|calls| !calls.is_empty()),
        }
    }

    /// Tool-role message carrying a serialized tool result.
    pub fn tool_result(content: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::System { content } | Self::User { content } | Self::Tool { content } => {
                Some(content.as_str())
            }
            Self::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// Tool calls requested by this message, if it is an assistant message
    /// that carries any.
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls.as_deref(),
            _ => None,
        }
    }
}
