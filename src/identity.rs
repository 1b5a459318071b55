//! Caller identity resolution.

use async_trait::async_trait;

/// Resolves a caller id to a display name, best-effort.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Display name for `user_id`, or `None` when unknown.
    async fn display_name(&self, user_id: &str) -> Option<String>;
}

/// Lookup that knows nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUserLookup;

#[async_trait]
impl UserLookup for NoUserLookup {
    async fn display_name(&self, _user_id: &str) -> Option<String> {
        None
    }
}
