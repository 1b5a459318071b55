//! Shared HTTP plumbing for the bundled model server client.

use std::sync::OnceLock;

use crate::error::ChatError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the process-wide reqwest client.
///
/// No overall request timeout: local generation can take minutes on modest
/// hardware. Connection establishment is bounded.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Turn a non-success response into a server-reported error. The server
/// wraps failures as `{"error": "..."}`; fall back to the raw body.
pub fn body_to_error(status: u16, body: &str) -> ChatError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    ChatError::response(status, message)
}
