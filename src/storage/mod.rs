//! Agent Storage Abstraction
//!
//! Information Hiding:
//! - Storage backend implementation details hidden behind trait
//! - Allows swapping between memory and SQLite without API changes
//! - Conversation history is never stored here; it lives only in memory

use crate::agents::Agent;
use crate::error::Result;
use async_trait::async_trait;

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryAgentStore;
pub use sqlite::SqliteAgentStore;

/// Persistence collaborator for agent records
#[async_trait]
pub trait AgentStore: Send + Sync {
    /// Insert or replace an agent record
    async fn save_agent(&self, agent: &Agent) -> Result<()>;

    /// Returns None if no agent has the given id
    async fn get_agent(&self, agent_id: &str) -> Result<Option<Agent>>;

    async fn list_agents(&self) -> Result<Vec<Agent>>;
}
