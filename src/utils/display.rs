use crate::agents::Agent;
use crate::core::{Message, Role};
use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_prompt(text: &str) {
    print!("{}", text.yellow().bold());
}

pub fn print_message(message: &Message) {
    let label = match message.role() {
        Role::User => "You".yellow().bold(),
        Role::Assistant => "Assistant".magenta().bold(),
    };
    println!("{}: {}", label, message.content());
}

pub fn print_agent(agent: &Agent) {
    println!(
        "{}  {} [{}]",
        agent.id.bright_white().bold(),
        agent.name,
        agent.kind.tag().cyan()
    );
    if !agent.description.is_empty() {
        println!("    {}", agent.description.dimmed());
    }
}
