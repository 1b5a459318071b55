//! The conversation agent and its bounded request/tool cycle.

use std::sync::{Arc, RwLock};

use serde_json::json;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::{AgentConfig, AgentOptions, TurnSettings};
use crate::error::{ToolError, TurnError};
use crate::history::{trim, HistoryLookup, HistoryStore, MessageHistory, SharedHistory};
use crate::identity::{NoUserLookup, UserLookup};
use crate::prompt::{
    PromptRenderer, PromptVars, TemplateRenderer, BASE_PROMPT, DEFAULT_INSTRUCTIONS,
};
use crate::provider::{ChatClient, ChatRequest};
use crate::tools::{format_tool, ToolContext, ToolInput, ToolRegistry, ToolSession, ToolSpec};
use crate::types::{ChatMessage, ToolCall, TurnRequest, TurnResult};

/// Upper bound on model calls within one turn.
pub const MAX_TOOL_ITERATIONS: usize = 10;

/// Integration identifier passed to tool sessions.
const PLATFORM: &str = "colloquy";

/// Requesting-subsystem identifier passed to tool sessions.
const ASSISTANT: &str = "conversation";

/// Outcome of one model exchange within a turn.
enum Exchange {
    /// The reply is the final answer for this turn.
    Final(Option<String>),
    /// Tools ran; the model must be called again with their results.
    Continue(Option<String>),
}

/// Drives multi-turn conversations against a model server, with bounded
/// history, TTL expiry, and an agentic tool-calling cycle.
///
/// The agent is safe to share across tasks for different conversation ids.
/// Callers must not run two turns on the same id concurrently.
pub struct ConversationAgent {
    config: AgentConfig,
    options: RwLock<AgentOptions>,
    client: Arc<dyn ChatClient>,
    registry: Option<Arc<dyn ToolRegistry>>,
    renderer: Arc<dyn PromptRenderer>,
    users: Arc<dyn UserLookup>,
    store: HistoryStore,
}

impl ConversationAgent {
    pub fn new(config: AgentConfig, client: Arc<dyn ChatClient>) -> Self {
        Self {
            config,
            options: RwLock::new(AgentOptions::default()),
            client,
            registry: None,
            renderer: Arc::new(TemplateRenderer),
            users: Arc::new(NoUserLookup),
            store: HistoryStore::default(),
        }
    }

    /// Attach the registry consulted when a tool API id is configured.
    pub fn with_tool_registry(mut self, registry: Arc<dyn ToolRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the bundled prompt renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn PromptRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Attach a caller identity resolver.
    pub fn with_user_lookup(mut self, users: Arc<dyn UserLookup>) -> Self {
        self.users = users;
        self
    }

    /// Replace the history store, e.g. to change the idle TTL.
    pub fn with_history_store(mut self, store: HistoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current live option overrides.
    pub fn options(&self) -> AgentOptions {
        self.options.read().expect("lock should succeed").clone()
    }

    /// Replace the live option overrides; takes effect on the next turn.
    pub fn update_options(&self, options: AgentOptions) {
        *self.options.write().expect("lock should succeed") = options;
    }

    /// The conversation history store.
    pub fn history(&self) -> &HistoryStore {
        &self.store
    }

    /// Process one caller utterance end to end.
    ///
    /// Always yields a [`TurnResult`] carrying the conversation id; terminal
    /// failures are adapted into an error response rather than propagated.
    pub async fn process_turn(&self, input: TurnRequest) -> TurnResult {
        let settings = {
            let options = self.options.read().expect("lock should succeed");
            self.config.effective(&options)
        };
        let conversation_id = input
            .conversation_id
            .clone()
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        debug!(%conversation_id, model = %settings.model, "processing turn");

        match self.run_turn(&input, &conversation_id, &settings).await {
            Ok(speech) => TurnResult::speech(conversation_id, speech),
            Err(err) => {
                error!(%conversation_id, error = %err, "turn failed");
                TurnResult::error(conversation_id, err.user_message())
            }
        }
    }

    async fn run_turn(
        &self,
        input: &TurnRequest,
        conversation_id: &str,
        settings: &TurnSettings,
    ) -> Result<String, TurnError> {
        let session = match settings.tool_api_id.as_deref() {
            Some(api_id) => Some(self.acquire_session(api_id, input).await?),
            None => None,
        };
        let tools: Option<Vec<ToolSpec>> = session.as_ref().map(|session| {
            session
                .tools()
                .iter()
                .map(|tool| format_tool(tool, session.schema_converter()))
                .collect()
        });

        let user_name = match input.context.user_id.as_deref() {
            Some(user_id) => self.users.display_name(user_id).await,
            None => None,
        };

        let entry = self
            .resolve_history(
                conversation_id,
                input,
                settings,
                session.as_deref(),
                user_name.as_deref(),
            )
            .await?;

        // Expire idle conversations store-wide, then bound this one, then
        // record the new utterance. The utterance itself is never subject to
        // this turn's trim.
        self.store.prune();
        let mut history = entry.lock().await;
        trim(&mut history, settings.max_history);
        history.push(ChatMessage::user(input.text.clone()));

        let mut speech: Option<String> = None;
        for iteration in 1..=MAX_TOOL_ITERATIONS {
            let outcome = self
                .exchange(
                    &mut history,
                    settings,
                    tools.as_ref(),
                    session.as_deref(),
                    iteration,
                )
                .await?;
            match outcome {
                Exchange::Final(content) => return Ok(content.unwrap_or_default()),
                Exchange::Continue(content) => speech = content,
            }
        }

        // Cap reached with tools still pending: answer with the last reply's
        // content rather than erroring out.
        warn!(conversation_id, "tool iteration cap reached");
        Ok(speech.unwrap_or_default())
    }

    async fn acquire_session(
        &self,
        api_id: &str,
        input: &TurnRequest,
    ) -> Result<Box<dyn ToolSession>, TurnError> {
        let registry = self.registry.as_ref().ok_or_else(|| {
            TurnError::ToolApi(ToolError::host(format!(
                "no tool registry attached for tool API '{api_id}'"
            )))
        })?;
        let context = ToolContext {
            platform: PLATFORM.to_string(),
            assistant: ASSISTANT.to_string(),
            user_prompt: input.text.clone(),
            language: input.language.clone(),
            user_id: input.context.user_id.clone(),
            device_id: input.context.device_id.clone(),
        };
        Ok(registry.acquire(api_id, context).await?)
    }

    async fn resolve_history(
        &self,
        conversation_id: &str,
        input: &TurnRequest,
        settings: &TurnSettings,
        session: Option<&dyn ToolSession>,
        user_name: Option<&str>,
    ) -> Result<SharedHistory, TurnError> {
        match self.store.lookup(conversation_id) {
            HistoryLookup::Fresh(entry) => Ok(entry),
            HistoryLookup::Expired | HistoryLookup::Missing => {
                let prompt = self
                    .render_system_prompt(input, settings, session, user_name)
                    .await?;
                debug!(conversation_id, "created conversation history");
                Ok(self
                    .store
                    .insert(conversation_id, MessageHistory::new(prompt)))
            }
        }
    }

    /// Assemble and render the system prompt for a new history.
    async fn render_system_prompt(
        &self,
        input: &TurnRequest,
        settings: &TurnSettings,
        session: Option<&dyn ToolSession>,
        user_name: Option<&str>,
    ) -> Result<String, TurnError> {
        let vars = PromptVars::new()
            .with(
                "now",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            )
            .with("assistant_name", settings.assistant_name.clone())
            .with("user_name", user_name.unwrap_or_default())
            .with("language", input.language.clone())
            .with(
                "user_id",
                input.context.user_id.clone().unwrap_or_default(),
            )
            .with(
                "device_id",
                input.context.device_id.clone().unwrap_or_default(),
            );
        let template = format!(
            "{BASE_PROMPT}{}",
            settings.prompt.as_deref().unwrap_or(DEFAULT_INSTRUCTIONS)
        );
        let mut prompt = self.renderer.render(&template, &vars).await?;
        if let Some(fragment) = session.and_then(|session| session.prompt_fragment()) {
            prompt.push('\n');
            prompt.push_str(fragment);
        }
        Ok(prompt)
    }

    /// One model call plus, when requested and possible, the tool calls it
    /// asked for.
    async fn exchange(
        &self,
        history: &mut MessageHistory,
        settings: &TurnSettings,
        tools: Option<&Vec<ToolSpec>>,
        session: Option<&dyn ToolSession>,
        iteration: usize,
    ) -> Result<Exchange, TurnError> {
        let request = ChatRequest::new(settings.model.clone(), history.messages().to_vec())
            .with_tools(tools.cloned());
        debug!(iteration, messages = history.len(), "requesting model reply");
        let response = self.client.chat(&request).await?;

        let (content, tool_calls) = match response.message {
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => (content, tool_calls),
            other => (other.content().map(str::to_string), None),
        };
        let reply = ChatMessage::assistant_reply(content, tool_calls);
        let content = reply.content().map(str::to_string);
        let calls = reply.tool_calls().map(|calls| calls.to_vec());
        history.push(reply);

        let (Some(session), Some(calls)) = (session, calls) else {
            return Ok(Exchange::Final(content));
        };

        for call in &calls {
            let payload = self.execute_tool(session, call).await;
            history.push(ChatMessage::tool_result(payload.to_string()));
        }
        Ok(Exchange::Continue(content))
    }

    /// Run one tool call; expected failures become an error payload the
    /// model can see on the next exchange.
    async fn execute_tool(
        &self,
        session: &dyn ToolSession,
        call: &ToolCall,
    ) -> serde_json::Value {
        let input = ToolInput {
            tool_name: call.name().to_string(),
            tool_args: call.arguments().clone(),
        };
        debug!(tool = %input.tool_name, args = %input.tool_args, "tool call");
        match session.call_tool(input).await {
            Ok(result) => {
                debug!(tool = %call.name(), "tool response received");
                result
            }
            Err(err) => {
                warn!(tool = %call.name(), error = %err, "tool call failed");
                let mut payload = json!({ "error": err.kind() });
                let text = err.to_string();
                if !text.is_empty() {
                    payload["error_text"] = json!(text);
                }
                payload
            }
        }
    }
}
