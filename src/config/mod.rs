//! Agent configuration: persisted settings plus live option overrides.
//!
//! Settings mirror how a host stores them: a fixed config written once and a
//! mutable options layer that can change between turns. The two are merged
//! into [`TurnSettings`] at the start of every turn, so option edits take
//! effect on the next utterance without rebuilding the agent.

use bon::Builder;

/// Default cap on retained user turns per conversation.
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// Assistant display name used when none is configured.
pub const DEFAULT_ASSISTANT_NAME: &str = "Assistant";

/// Persisted agent settings, fixed at construction.
#[derive(Debug, Clone, Builder)]
pub struct AgentConfig {
    /// Model name requested from the model server.
    #[builder(into)]
    pub model: String,

    /// Display name substituted for `{{ assistant_name }}` in prompts.
    #[builder(into, default = String::from(DEFAULT_ASSISTANT_NAME))]
    pub assistant_name: String,

    /// Tool API acquired each turn; tool calling is disabled when absent.
    #[builder(into)]
    pub tool_api_id: Option<String>,

    /// Instructions template used instead of the default instructions.
    #[builder(into)]
    pub prompt: Option<String>,

    /// Max user turns retained per conversation; 0 keeps everything.
    #[builder(default = DEFAULT_MAX_HISTORY)]
    pub max_history: usize,
}

/// Live overrides re-merged over [`AgentConfig`] on every turn.
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    pub model: Option<String>,
    pub tool_api_id: Option<String>,
    pub prompt: Option<String>,
    pub max_history: Option<usize>,
}

/// Effective settings for a single turn.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub model: String,
    pub assistant_name: String,
    pub tool_api_id: Option<String>,
    pub prompt: Option<String>,
    pub max_history: usize,
}

impl AgentConfig {
    /// Merge live options over the persisted settings.
    pub fn effective(&self, options: &AgentOptions) -> TurnSettings {
        TurnSettings {
            model: options.model.clone().unwrap_or_else(|| self.model.clone()),
            assistant_name: self.assistant_name.clone(),
            tool_api_id: options
                .tool_api_id
                .clone()
                .or_else(|| self.tool_api_id.clone()),
            prompt: options.prompt.clone().or_else(|| self.prompt.clone()),
            max_history: options.max_history.unwrap_or(self.max_history),
        }
    }
}
