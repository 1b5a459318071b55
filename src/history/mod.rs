//! Per-conversation message histories and the process-wide store.
//!
//! The store owns every history. Entries are handed out as shared handles: a
//! turn locks the single entry it mutates, while pruning only touches the map
//! and its timestamps, so expiry never blocks an in-flight turn. Turns on the
//! same conversation id must not overlap; that invariant is enforced by the
//! caller, not here.

pub mod trim;

pub use trim::trim;

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::types::{ChatMessage, Role};

/// Idle time after which a conversation history is discarded.
pub const DEFAULT_HISTORY_TTL: Duration = Duration::from_secs(60 * 60);

/// Shared handle to one conversation's history.
pub type SharedHistory = Arc<Mutex<MessageHistory>>;

/// Ordered transcript of one conversation. The first message is always the
/// system prompt; trimming never removes it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageHistory {
    messages: Vec<ChatMessage>,
}

impl MessageHistory {
    /// New history seeded with its rendered system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of user-role messages; drives the trim threshold.
    pub fn user_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| message.role() == Role::User)
            .count()
    }

    pub(crate) fn messages_mut(&mut self) -> &mut Vec<ChatMessage> {
        &mut self.messages
    }
}

/// Outcome of a store lookup.
#[derive(Debug)]
pub enum HistoryLookup {
    /// Live entry; its activity timestamp has been refreshed.
    Fresh(SharedHistory),
    /// An entry existed but idled past the TTL; it has been evicted and the
    /// caller should create a fresh one.
    Expired,
    /// No entry for this id.
    Missing,
}

struct StoreEntry {
    last_activity: Instant,
    history: SharedHistory,
}

/// Process-wide map from conversation id to history, with TTL expiry.
pub struct HistoryStore {
    ttl: Duration,
    entries: StdMutex<HashMap<String, StoreEntry>>,
}

impl HistoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: StdMutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a conversation, refreshing its activity timestamp when it is
    /// still live and evicting it when it has idled past the TTL.
    pub fn lookup(&self, conversation_id: &str) -> HistoryLookup {
        let mut entries = self.lock_entries();
        let now = Instant::now();
        match entries.get_mut(conversation_id) {
            Some(entry) if now.duration_since(entry.last_activity) > self.ttl => {
                entries.remove(conversation_id);
                debug!(conversation_id, "evicted expired history on lookup");
                HistoryLookup::Expired
            }
            Some(entry) => {
                entry.last_activity = now;
                HistoryLookup::Fresh(Arc::clone(&entry.history))
            }
            None => HistoryLookup::Missing,
        }
    }

    /// Store a freshly created history and hand back its shared handle.
    pub fn insert(
        &self,
        conversation_id: impl Into<String>,
        history: MessageHistory,
    ) -> SharedHistory {
        let handle = Arc::new(Mutex::new(history));
        let entry = StoreEntry {
            last_activity: Instant::now(),
            history: Arc::clone(&handle),
        };
        self.lock_entries().insert(conversation_id.into(), entry);
        handle
    }

    /// Drop every entry idle strictly longer than the TTL. An entry exactly
    /// at the TTL is retained.
    pub fn prune(&self) {
        let now = Instant::now();
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_activity) <= self.ttl);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "pruned idle conversation histories");
        }
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn contains(&self, conversation_id: &str) -> bool {
        self.lock_entries().contains_key(conversation_id)
    }

    /// Ids of all live conversations, in no particular order.
    pub fn conversation_ids(&self) -> Vec<String> {
        self.lock_entries().keys().cloned().collect()
    }

    /// Handle to an entry without refreshing its timestamp. Observation
    /// only; turns go through [`HistoryStore::lookup`].
    pub fn entry(&self, conversation_id: &str) -> Option<SharedHistory> {
        self.lock_entries()
            .get(conversation_id)
            .map(|entry| Arc::clone(&entry.history))
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, StoreEntry>> {
        self.entries.lock().expect("lock should succeed")
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_TTL)
    }
}
