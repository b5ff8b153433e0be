//! Dispatcher - Routes agent messages to providers with conversational context
//!
//! Information Hiding:
//! - Provider resolution table hidden behind send()
//! - History bookkeeping (user append, snapshot, assistant append) internalized
//! - The history lock is never held while a provider call is in flight

use crate::core::{HistoryStore, Role};
use crate::error::{RelayError, Result};
use crate::providers::{ProviderAdapter, ProviderKind};
use std::collections::HashMap;
use std::sync::Arc;

pub struct Dispatcher {
    history: Arc<HistoryStore>,
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl Dispatcher {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self {
            history,
            adapters: HashMap::new(),
        }
    }

    /// Register the adapter serving agents tagged with `kind`
    pub fn with_adapter(mut self, kind: ProviderKind, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(kind, adapter);
        self
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.adapters.contains_key(&kind)
    }

    /// Provider kinds with a registered adapter, in tag-table order
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.is_configured(*kind))
            .collect()
    }

    fn resolve(&self, agent_id: &str) -> Result<&Arc<dyn ProviderAdapter>> {
        let kind = ProviderKind::from_agent_id(agent_id)
            .ok_or_else(|| RelayError::UnknownAgentType(agent_id.to_string()))?;

        self.adapters
            .get(&kind)
            .ok_or(RelayError::ProviderNotConfigured(kind))
    }

    /// Send a user message on behalf of `agent_id` and return the provider's reply.
    ///
    /// Routing failures leave history untouched. A provider failure keeps the
    /// user message that was already recorded and appends nothing else.
    /// The provider call runs on its own task, so dropping this future does
    /// not cancel it and a late reply is still recorded.
    pub async fn send(&self, agent_id: &str, message: &str) -> Result<String> {
        let adapter = Arc::clone(self.resolve(agent_id)?);

        self.history.append(agent_id, Role::User, message);
        let snapshot = self.history.snapshot(agent_id);

        tracing::debug!(
            "[Dispatcher] Sending message for agent '{}' to {} with {} history entries",
            agent_id,
            adapter.name(),
            snapshot.len()
        );

        let history = Arc::clone(&self.history);
        let agent = agent_id.to_string();
        let message = message.to_string();

        let task = tokio::spawn(async move {
            let reply = adapter.complete(&message, &snapshot).await?;
            history.append(&agent, Role::Assistant, reply.as_str());
            tracing::info!("[Dispatcher] Chat request for agent '{}' completed", agent);
            Ok::<_, anyhow::Error>(reply)
        });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(anyhow::anyhow!("provider task failed: {}", e)),
        };

        outcome.map_err(|source| {
            tracing::error!(
                "[Dispatcher] Error communicating with agent {}: {:#}",
                agent_id,
                source
            );
            RelayError::Provider {
                agent_id: agent_id.to_string(),
                source,
            }
        })
    }

    /// Forget the agent's conversation
    pub fn reset(&self, agent_id: &str) {
        self.history.clear(agent_id);
    }
}
