//! Turn request and result types: the caller-facing surface of the agent.

use bon::Builder;
use serde::Serialize;
use strum::Display;

/// One caller utterance to process.
#[derive(Debug, Clone, Builder)]
pub struct TurnRequest {
    /// Raw user text.
    #[builder(into)]
    pub text: String,

    /// Language tag of the utterance, forwarded to tool sessions.
    #[builder(into, default = String::from("en"))]
    pub language: String,

    /// Session to continue; a fresh id is generated when absent.
    #[builder(into)]
    pub conversation_id: Option<String>,

    /// Caller identity and device context.
    #[builder(default)]
    pub context: TurnContext,
}

/// Who is speaking, and from where.
#[derive(Debug, Clone, Default)]
pub struct TurnContext {
    pub user_id: Option<String>,
    pub device_id: Option<String>,
}

/// Outcome of one processed turn. The conversation id is present on every
/// path, including errors, so the caller can resume the same session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    pub conversation_id: String,
    #[serde(flatten)]
    pub response: TurnResponse,
}

/// Final answer or terminal failure of a turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TurnResponse {
    Speech {
        speech_text: String,
    },
    Error {
        error_code: ErrorCode,
        error_text: String,
    },
}

/// Coarse machine-readable category attached to error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    Unknown,
}

impl TurnResult {
    pub fn speech(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            response: TurnResponse::Speech {
                speech_text: text.into(),
            },
        }
    }

    pub fn error(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            response: TurnResponse::Error {
                error_code: ErrorCode::Unknown,
                error_text: text.into(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.response, TurnResponse::Error { .. })
    }

    /// Final answer text, when the turn succeeded.
    pub fn speech_text(&self) -> Option<&str> {
        match &self.response {
            TurnResponse::Speech { speech_text } => Some(speech_text),
            TurnResponse::Error { .. } => None,
        }
    }

    /// Error message, when the turn failed.
    pub fn error_text(&self) -> Option<&str> {
        match &self.response {
            TurnResponse::Speech { .. } => None,
            TurnResponse::Error { error_text, .. } => Some(error_text),
        }
    }
}
