//! Colloquy: conversation-session core for local LLM assistants.
//!
//! Owns per-conversation message histories (bounded, expired after idle
//! TTL) and drives the agentic request/tool-call cycle against an
//! Ollama-compatible model server. The model client, prompt renderer, tool
//! registry, and identity lookup are trait seams; bundled implementations
//! cover the common local setup.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use colloquy::prelude::*;
//!
//! # async fn example() {
//! let config = AgentConfig::builder().model("llama3.2").build();
//! let client = Arc::new(OllamaClient::from_env());
//! let agent = ConversationAgent::new(config, client);
//!
//! let result = agent
//!     .process_turn(TurnRequest::builder().text("Why is the sky blue?").build())
//!     .await;
//! println!("{}", result.speech_text().unwrap_or("(no answer)"));
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod history;
pub mod identity;
pub mod prelude;
pub mod prompt;
pub mod provider;
pub mod tools;
pub mod types;
