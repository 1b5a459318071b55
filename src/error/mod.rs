//! Error types for colloquy.

use thiserror::Error;

/// Failure talking to the model server.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request never produced a usable response (connect, timeout, decode).
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with an error status and message.
    #[error("Response error (status {status}): {message}")]
    Response { status: u16, message: String },
}

impl ChatError {
    /// Create a server-reported error.
    pub fn response(status: u16, message: impl Into<String>) -> Self {
        Self::Response {
            status,
            message: message.into(),
        }
    }
}

/// Failure raised by a tool registry, either while acquiring a session or
/// while executing a tool call.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool rejected its arguments.
    #[error("{0}")]
    Validation(String),

    /// The host failed while acting on the call, or the registry could not
    /// provide a session at all.
    #[error("{0}")]
    Host(String),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    /// Stable kind string written into tool-result error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Host(_) => "HostError",
        }
    }
}

/// Failure rendering a prompt template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template syntax error: {0}")]
    Syntax(String),

    #[error("Unknown template variable: {0}")]
    UnknownVariable(String),
}

/// Terminal failure of one conversation turn, before adaptation into the
/// caller-facing error response. Tool execution failures never reach this
/// type; they are folded into the transcript instead.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("prompt render failed: {0}")]
    Template(#[from] TemplateError),

    #[error("tool API unavailable: {0}")]
    ToolApi(#[from] ToolError),

    #[error("model server failed: {0}")]
    Chat(#[from] ChatError),
}

impl TurnError {
    /// Human-readable message surfaced to the caller in the error response.
    pub fn user_message(&self) -> String {
        match self {
            Self::Template(err) => {
                format!("Sorry, I had a problem generating my prompt: {err}")
            }
            Self::ToolApi(err) => format!("Error preparing tool API: {err}"),
            Self::Chat(err) => {
                format!("Sorry, I had a problem talking to the model server: {err}")
            }
        }
    }
}
