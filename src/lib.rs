//! Agent Relay - Routes chat messages to conversational AI providers
//!
//! Each agent keeps a short, bounded history of prior turns which is handed to
//! its provider on every call so replies carry conversational context.

pub mod agents;
pub mod cli;
pub mod config;
pub mod core;
pub mod dispatcher;
pub mod error;
pub mod providers;
pub mod server;
pub mod storage;
pub mod utils;

pub use agents::{Agent, NewAgent};
pub use config::Settings;
pub use crate::core::{HistoryStore, Message, Role};
pub use dispatcher::Dispatcher;
pub use error::RelayError;
pub use providers::{ProviderAdapter, ProviderKind};

use providers::{GrokAdapter, OpenAIAdapter};
use std::path::Path;
use std::sync::Arc;
use storage::{AgentStore, SqliteAgentStore};

/// Application object owning the dispatcher, its history store and agent storage.
/// Built once at startup and shared by handle.
pub struct Relay {
    settings: Settings,
    dispatcher: Dispatcher,
    agents: Arc<dyn AgentStore>,
}

impl Relay {
    pub fn new(settings: Settings, dispatcher: Dispatcher, agents: Arc<dyn AgentStore>) -> Self {
        Self {
            settings,
            dispatcher,
            agents,
        }
    }

    /// Wire up adapters and storage from settings and process environment
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let history = Arc::new(HistoryStore::new(settings.history.max_length)?);
        let mut dispatcher = Dispatcher::new(history);

        match Settings::openai_api_key() {
            Ok(api_key) => {
                dispatcher = dispatcher.with_adapter(
                    ProviderKind::OpenAI,
                    Arc::new(OpenAIAdapter::new(api_key, settings.openai.clone())),
                );
            }
            Err(e) => tracing::warn!("OpenAI agents disabled: {}", e),
        }

        dispatcher = dispatcher.with_adapter(
            ProviderKind::Grok,
            Arc::new(GrokAdapter::new(Settings::grok_api_key(), settings.grok.clone())),
        );

        let agents: Arc<dyn AgentStore> = if settings.storage.database_path == ":memory:" {
            Arc::new(SqliteAgentStore::in_memory()?)
        } else {
            Arc::new(SqliteAgentStore::open(Path::new(&settings.storage.database_path))?)
        };

        let providers: Vec<&str> = dispatcher
            .configured_providers()
            .into_iter()
            .map(|kind| kind.tag())
            .collect();
        tracing::info!(
            "Relay initialized (history max_length {}, providers: {})",
            settings.history.max_length,
            providers.join(", ")
        );

        Ok(Self::new(settings, dispatcher, agents))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> &HistoryStore {
        self.dispatcher.history()
    }

    pub fn agent_store(&self) -> &Arc<dyn AgentStore> {
        &self.agents
    }

    /// Validate and persist a new agent, assigning it a routable identifier
    pub async fn create_agent(&self, request: NewAgent) -> error::Result<Agent> {
        if request.name.trim().is_empty() {
            return Err(RelayError::InvalidRequest("Agent name is required".to_string()));
        }

        let agent = request.into_agent();
        self.agents.save_agent(&agent).await?;
        tracing::info!("Agent created: {} ({})", agent.id, agent.name);
        Ok(agent)
    }

    /// Boundary-checked entry into [`Dispatcher::send`]
    pub async fn chat(&self, agent_id: &str, message: &str) -> error::Result<String> {
        if agent_id.is_empty() {
            return Err(RelayError::InvalidRequest("agentID is required".to_string()));
        }
        if message.trim().is_empty() {
            return Err(RelayError::InvalidRequest("Message is required".to_string()));
        }

        self.dispatcher.send(agent_id, message).await
    }
}
