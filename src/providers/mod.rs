//! Provider Adapters - Boundary over external conversational AI services
//!
//! Information Hiding:
//! - Wire formats and credentials hidden inside each adapter
//! - Routing convention (identifier tag prefix) hidden behind ProviderKind
//! - Adapters share no state with the history store

pub mod grok;
pub mod openai;

use crate::core::Message;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use grok::GrokAdapter;
pub use openai::OpenAIAdapter;

/// One implementation per backing AI service
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Adapter name used in logs
    fn name(&self) -> &str;

    /// Produce a reply to `message` given the ordered conversation `history`.
    /// The history already ends with `message` when called by the dispatcher.
    async fn complete(&self, message: &str, history: &[Message]) -> Result<String>;
}

/// Closed set of provider tags an agent identifier can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Grok,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAI, ProviderKind::Grok];

    pub fn tag(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Grok => "grok",
        }
    }

    /// Resolve the provider from the tag an agent identifier starts with.
    /// Identifiers shorter than every tag simply match nothing.
    pub fn from_agent_id(agent_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| agent_id.starts_with(kind.tag()))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown provider type '{}'", s))
    }
}
