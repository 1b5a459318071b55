//! Conversation agent: per-turn orchestration over history, prompt, tools,
//! and the model server.

pub mod agent;

pub use agent::{ConversationAgent, MAX_TOOL_ITERATIONS};
