use crate::providers::ProviderKind;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agent-relay")]
#[command(author, version, about = "Chat with AI provider agents that remember recent turns", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Send a single chat message to an agent
    Chat { agent_id: String, message: String },

    /// Start an interactive chat session with an agent
    Interactive { agent_id: String },

    /// Create and persist a new agent
    CreateAgent {
        #[arg(short, long)]
        name: String,

        /// Provider tag: openai or grok
        #[arg(short = 't', long = "type")]
        kind: ProviderKind,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Persona context for the agent
        #[arg(short, long, default_value = "")]
        context: String,
    },

    /// List stored agents
    Agents,
}
