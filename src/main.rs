use agent_relay::cli::{Cli, Commands};
use agent_relay::{utils, NewAgent, ProviderKind, Relay, Settings};
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let relay = Arc::new(Relay::from_settings(settings)?);

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| relay.settings().server.bind.clone());
            agent_relay::server::serve(relay, &bind).await
        }
        Commands::Chat { agent_id, message } => handle_chat(&relay, &agent_id, &message).await,
        Commands::Interactive { agent_id } => handle_interactive(&relay, &agent_id).await,
        Commands::CreateAgent {
            name,
            kind,
            description,
            context,
        } => handle_create_agent(&relay, name, kind, description, context).await,
        Commands::Agents => handle_list_agents(&relay).await,
    }
}

async fn handle_chat(relay: &Relay, agent_id: &str, message: &str) -> Result<()> {
    utils::print_info("Sending request...");
    let reply = relay.chat(agent_id, message).await?;
    println!("\n{}", reply);
    Ok(())
}

async fn handle_interactive(relay: &Relay, agent_id: &str) -> Result<()> {
    utils::print_header(&format!("Interactive Mode ({})", agent_id));
    utils::print_info("Type your messages (Ctrl+C to exit, /help for commands)");
    utils::print_info(&format!(
        "Keeping the last {} messages as context\n",
        relay.history().max_length()
    ));

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        utils::print_prompt("You: ");
        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            return Ok(());
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/clear" => {
                relay.dispatcher().reset(agent_id);
                utils::print_success("Conversation history cleared\n");
                continue;
            }
            "/count" => {
                let count = relay.history().message_count(agent_id);
                utils::print_info(&format!("Messages in history: {}\n", count));
                continue;
            }
            "/history" => {
                for message in relay.history().snapshot(agent_id) {
                    utils::print_message(&message);
                }
                println!();
                continue;
            }
            "/help" => {
                println!("Special commands:");
                println!("  /clear    - Clear conversation history");
                println!("  /count    - Show message count");
                println!("  /history  - Show remembered messages");
                println!("  /help     - Show this help");
                println!("  Ctrl+C    - Exit\n");
                continue;
            }
            _ => {}
        }

        utils::print_info("Assistant: ");
        match relay.chat(agent_id, input).await {
            Ok(reply) => println!("{}\n", reply),
            Err(e) if e.is_retryable() => utils::print_error(&format!("{}\n", e)),
            Err(e) => return Err(e.into()),
        }
    }
}

async fn handle_create_agent(
    relay: &Relay,
    name: String,
    kind: ProviderKind,
    description: String,
    context: String,
) -> Result<()> {
    let agent = relay
        .create_agent(NewAgent {
            name,
            description,
            kind,
            context,
        })
        .await?;

    utils::print_success("Agent created");
    utils::print_agent(&agent);
    Ok(())
}

async fn handle_list_agents(relay: &Relay) -> Result<()> {
    let agents = relay.agent_store().list_agents().await?;
    if agents.is_empty() {
        utils::print_info("No agents stored");
    }
    for agent in &agents {
        utils::print_agent(agent);
    }
    Ok(())
}
