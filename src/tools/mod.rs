//! Tool registry contract: the external capability broker that advertises
//! callable tools and executes them on the model's behalf.
//!
//! The agent never owns tools. It acquires a [`ToolSession`] scoped to one
//! turn, advertises the session's tools to the model, and routes the model's
//! tool calls back through the session, strictly in the order the model
//! requested them.

pub mod format;

pub use format::{format_tool, FunctionSpec, ToolSpec};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Converts a host-specific parameter schema into the plain JSON schema the
/// model server understands.
pub type SchemaConverter = dyn Fn(&serde_json::Value) -> serde_json::Value + Send + Sync;

/// A callable tool as advertised by a registry session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: serde_json::Value,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInput {
    pub tool_name: String,
    pub tool_args: serde_json::Value,
}

/// Scope a tool session is acquired for: who is asking, from where, and
/// through which subsystem.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Integration acquiring the session.
    pub platform: String,
    /// Subsystem the request came through.
    pub assistant: String,
    /// Raw user utterance for this turn.
    pub user_prompt: String,
    /// Language tag of the utterance.
    pub language: String,
    pub user_id: Option<String>,
    pub device_id: Option<String>,
}

/// Broker resolving a tool API id into a live session.
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Acquire a session scoped to one turn. Fails with a host error when
    /// the id is unknown or the registry is misconfigured.
    async fn acquire(
        &self,
        api_id: &str,
        context: ToolContext,
    ) -> Result<Box<dyn ToolSession>, ToolError>;
}

/// Live tool API session, valid for the duration of one turn.
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// Tools this session exposes.
    fn tools(&self) -> &[ToolDescriptor];

    /// Extra system-prompt text the tool API wants appended.
    fn prompt_fragment(&self) -> Option<&str> {
        None
    }

    /// Hook converting host-specific parameter schemas for the wire.
    fn schema_converter(&self) -> Option<&SchemaConverter> {
        None
    }

    /// Execute one tool call.
    async fn call_tool(&self, input: ToolInput) -> Result<serde_json::Value, ToolError>;
}
