//! CLI entry point for Swarm.

use clap::{Args, Parser, Subcommand};

use crate::context::ContextVariables;

/// Swarm multi-agent CLI
#[derive(Parser, Debug)]
#[command(name = "swarm", version, about = "Swarm: multi-agent orchestration over chat completions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive conversation with an agent
    Chat(ChatArgs),
    /// Send one prompt and print the reply
    Ask(AskArgs),
}

/// Agent and run settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct AgentArgs {
    /// Agent name shown as the speaker
    #[arg(short, long, default_value = "Agent")]
    pub name: String,

    /// Model to use (defaults to SWARM_MODEL or gpt-4o)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Agent instructions (system prompt)
    #[arg(short, long)]
    pub system: Option<String>,

    /// Initial context variable, as KEY=VALUE (repeatable)
    #[arg(short = 'c', long = "context", value_parser = parse_context_pair)]
    pub context: Vec<(String, String)>,

    /// Stream responses as they are generated
    #[arg(long)]
    pub stream: bool,

    /// Log requests and tool calls
    #[arg(long)]
    pub debug: bool,

    /// Stop after this many completions per run
    #[arg(long)]
    pub max_turns: Option<usize>,
}

impl AgentArgs {
    /// Context variables given with `--context`.
    pub fn context_variables(&self) -> ContextVariables {
        self.context.iter().cloned().collect()
    }
}

/// Arguments for `swarm chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub agent: AgentArgs,
}

/// Arguments for `swarm ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    #[command(flatten)]
    pub agent: AgentArgs,

    /// User prompt
    pub prompt: String,
}

fn parse_context_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
