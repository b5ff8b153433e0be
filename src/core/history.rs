//! Bounded Conversation History
//!
//! Information Hiding:
//! - Per-agent log layout (HashMap of VecDeque) hidden behind append/snapshot/clear
//! - Locking hidden from callers; readers only ever receive owned copies
//! - FIFO eviction applied inside the same critical section as the append

use super::message::{Message, Role};
use crate::error::{RelayError, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type ConversationLog = VecDeque<Message>;

/// Per-agent rolling message log, bounded at `max_length` entries per agent.
///
/// Entries are created lazily on the first append for an agent and removed
/// only by [`HistoryStore::clear`]. Nothing is persisted; dropping the store
/// discards every log.
#[derive(Debug)]
pub struct HistoryStore {
    conversations: RwLock<HashMap<String, ConversationLog>>,
    max_length: usize,
}

impl HistoryStore {
    pub fn new(max_length: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(RelayError::InvalidConfig(
                "history max_length must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            conversations: RwLock::new(HashMap::new()),
            max_length,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Append a message to the agent's log, evicting the oldest entries so
    /// that at most `max_length` remain.
    pub fn append(&self, agent_id: &str, role: Role, content: impl Into<String>) {
        let mut conversations = self.write();
        let log = conversations
            .entry(agent_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.max_length));

        log.push_back(Message::new(role, content));

        let mut evicted = 0;
        while log.len() > self.max_length {
            log.pop_front();
            evicted += 1;
        }

        tracing::debug!(
            "[HistoryStore] Appended {} message for agent '{}' ({} stored, {} evicted)",
            role,
            agent_id,
            log.len(),
            evicted
        );
    }

    /// Point-in-time copy of the agent's log in insertion order.
    /// Unknown agents yield an empty vector.
    pub fn snapshot(&self, agent_id: &str) -> Vec<Message> {
        let conversations = self.read();
        conversations
            .get(agent_id)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop the agent's entire log. Unknown agents are a no-op.
    pub fn clear(&self, agent_id: &str) {
        let removed = self.write().remove(agent_id);
        if let Some(log) = removed {
            tracing::debug!(
                "[HistoryStore] Cleared {} messages for agent '{}'",
                log.len(),
                agent_id
            );
        }
    }

    pub fn message_count(&self, agent_id: &str) -> usize {
        self.read().get(agent_id).map_or(0, VecDeque::len)
    }

    pub fn agent_ids(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    // Every critical section leaves the map consistent, so a poisoned lock
    // still guards valid data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ConversationLog>> {
        self.conversations
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ConversationLog>> {
        self.conversations
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
