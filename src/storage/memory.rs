//! In-Memory Agent Storage
//!
//! Information Hiding:
//! - HashMap storage structure hidden from users
//! - Thread-safe access via RwLock hidden behind async interface
//! - Suitable for testing and ephemeral deployments

use super::AgentStore;
use crate::agents::Agent;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Data is lost when process terminates
#[derive(Default)]
pub struct InMemoryAgentStore {
    agents: RwLock<HashMap<String, Agent>>,
}

impl InMemoryAgentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentStore for InMemoryAgentStore {
    async fn save_agent(&self, agent: &Agent) -> Result<()> {
        self.agents
            .write()
            .await
            .insert(agent.id.clone(), agent.clone());
        tracing::debug!("[InMemoryAgentStore] Saved agent '{}'", agent.id);
        Ok(())
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Option<Agent>> {
        Ok(self.agents.read().await.get(agent_id).cloned())
    }

    async fn list_agents(&self) -> Result<Vec<Agent>> {
        let agents = self.agents.read().await;
        let mut list: Vec<Agent> = agents.values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
    }
}
