use crate::providers::ProviderKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named configuration selecting the provider and persona for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    #[serde(default)]
    pub context: String,
}

/// Agent creation request, before an identifier is assigned
#[derive(Debug, Clone, Deserialize)]
pub struct NewAgent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    #[serde(default)]
    pub context: String,
}

impl NewAgent {
    pub fn into_agent(self) -> Agent {
        Agent {
            id: generate_agent_id(self.kind),
            name: self.name,
            description: self.description,
            kind: self.kind,
            context: self.context,
        }
    }
}

/// Identifiers carry the provider tag as prefix so the dispatcher can route them
pub fn generate_agent_id(kind: ProviderKind) -> String {
    format!("{}-{}", kind.tag(), Uuid::new_v4().simple())
}
