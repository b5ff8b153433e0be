use crate::providers::ProviderKind;
use thiserror::Error;

/// Failure kinds surfaced by the relay core and its collaborators
#[derive(Debug, Error)]
pub enum RelayError {
    /// The agent identifier carries no known provider tag
    #[error("unknown agent type for agent '{0}'")]
    UnknownAgentType(String),

    /// The tag is known but no adapter was registered for it
    #[error("provider '{0}' is not configured")]
    ProviderNotConfigured(ProviderKind),

    #[error("provider call failed for agent '{agent_id}': {source}")]
    Provider {
        agent_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Boundary validation failure (empty agent id, message or name)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid message role '{0}'")]
    InvalidRole(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl RelayError {
    /// Whether the caller may reasonably try the same request again
    pub fn is_retryable(&self) -> bool {
        matches!(self, RelayError::Provider { .. } | RelayError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
