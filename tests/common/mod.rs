//! Shared test helpers: scripted chat client, tool registry, and user lookup.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use colloquy::error::{ChatError, ToolError};
use colloquy::identity::UserLookup;
use colloquy::provider::{ChatClient, ChatRequest, ChatResponse};
use colloquy::tools::{
    SchemaConverter, ToolContext, ToolDescriptor, ToolInput, ToolRegistry, ToolSession,
};
use colloquy::types::{ChatMessage, ToolCall};

/// A chat client that replays scripted responses and records every request.
pub struct MockChatClient {
    script: Mutex<Vec<Result<ChatResponse, ChatError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain text reply.
    pub fn queue_reply(&self, text: &str) {
        self.script
            .lock()
            .unwrap()
            .push(Ok(ChatResponse::from_message(ChatMessage::assistant_reply(
                Some(text.to_string()),
                None,
            ))));
    }

    /// Queue an assistant message requesting a single tool call.
    pub fn queue_tool_call(&self, name: &str, arguments: serde_json::Value) {
        self.queue_tool_calls(vec![ToolCall::new(name, arguments)]);
    }

    /// Queue an assistant message requesting several tool calls at once.
    pub fn queue_tool_calls(&self, calls: Vec<ToolCall>) {
        self.script
            .lock()
            .unwrap()
            .push(Ok(ChatResponse::from_message(ChatMessage::assistant_reply(
                None,
                Some(calls),
            ))));
    }

    /// Queue a failed exchange.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push(Err(ChatError::response(status, message)));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            // An unscripted call is a test bug; fail the turn loudly.
            return Err(ChatError::response(500, "mock script exhausted"));
        }
        script.remove(0)
    }
}

/// Scripted tool session that records every call routed through it.
pub struct MockToolSession {
    tools: Vec<ToolDescriptor>,
    fragment: Option<String>,
    converter: Option<Box<SchemaConverter>>,
    results: Mutex<Vec<Result<serde_json::Value, ToolError>>>,
    calls: Mutex<Vec<ToolInput>>,
}

impl MockToolSession {
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        Self {
            tools,
            fragment: None,
            converter: None,
            results: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_prompt_fragment(mut self, fragment: &str) -> Self {
        self.fragment = Some(fragment.to_string());
        self
    }

    pub fn with_schema_converter(
        mut self,
        converter: impl Fn(&serde_json::Value) -> serde_json::Value + Send + Sync + 'static,
    ) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    /// Queue the result returned for the next tool call.
    pub fn queue_result(&self, result: serde_json::Value) {
        self.results.lock().unwrap().push(Ok(result));
    }

    /// Queue a failure returned for the next tool call.
    pub fn queue_failure(&self, error: ToolError) {
        self.results.lock().unwrap().push(Err(error));
    }

    /// Calls received so far, in execution order.
    pub fn calls(&self) -> Vec<ToolInput> {
        self.calls.lock().unwrap().clone()
    }

    async fn execute(&self, input: ToolInput) -> Result<serde_json::Value, ToolError> {
        self.calls.lock().unwrap().push(input);
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            return Ok(json!({"ok": true}));
        }
        results.remove(0)
    }
}

/// Per-turn handle the registry hands out, sharing one recording session.
struct SessionHandle(Arc<MockToolSession>);

#[async_trait]
impl ToolSession for SessionHandle {
    fn tools(&self) -> &[ToolDescriptor] {
        &self.0.tools
    }

    fn prompt_fragment(&self) -> Option<&str> {
        self.0.fragment.as_deref()
    }

    fn schema_converter(&self) -> Option<&SchemaConverter> {
        self.0.converter.as_deref()
    }

    async fn call_tool(&self, input: ToolInput) -> Result<serde_json::Value, ToolError> {
        self.0.execute(input).await
    }
}

/// Registry serving one scripted session under a single known API id.
pub struct MockToolRegistry {
    api_id: String,
    session: Arc<MockToolSession>,
    contexts: Mutex<Vec<ToolContext>>,
}

impl MockToolRegistry {
    pub fn new(api_id: &str, session: Arc<MockToolSession>) -> Self {
        Self {
            api_id: api_id.to_string(),
            session,
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Scope of the most recent acquisition.
    pub fn last_context(&self) -> Option<ToolContext> {
        self.contexts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ToolRegistry for MockToolRegistry {
    async fn acquire(
        &self,
        api_id: &str,
        context: ToolContext,
    ) -> Result<Box<dyn ToolSession>, ToolError> {
        self.contexts.lock().unwrap().push(context);
        if api_id != self.api_id {
            return Err(ToolError::host(format!("unknown tool API '{api_id}'")));
        }
        Ok(Box::new(SessionHandle(Arc::clone(&self.session))))
    }
}

/// User lookup backed by a fixed table.
pub struct StaticUserLookup {
    names: HashMap<String, String>,
}

impl StaticUserLookup {
    pub fn single(user_id: &str, name: &str) -> Self {
        let mut names = HashMap::new();
        names.insert(user_id.to_string(), name.to_string());
        Self { names }
    }
}

#[async_trait]
impl UserLookup for StaticUserLookup {
    async fn display_name(&self, user_id: &str) -> Option<String> {
        self.names.get(user_id).cloned()
    }
}

/// Descriptor for the weather tool used across the agent tests.
pub fn weather_tool() -> ToolDescriptor {
    ToolDescriptor::new(
        "get_weather",
        json!({
            "type": "object",
            "properties": {
                "city": {"type": "string"}
            },
            "required": ["city"]
        }),
    )
    .with_description("Look up the current weather for a city")
}
