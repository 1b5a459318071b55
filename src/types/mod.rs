//! Core data types shared across the crate.

pub mod message;
pub mod turn;

pub use message::{ChatMessage, FunctionCall, Role, ToolCall};
pub use turn::{ErrorCode, TurnContext, TurnRequest, TurnResponse, TurnResult};
