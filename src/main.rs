//! Swarm CLI binary entry point.

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use swarm::agent::Agent;
use swarm::cli::{AgentArgs, Cli, Commands};
use swarm::config::SwarmConfig;
use swarm::core::{RunOptions, Swarm, TurnBudget};
use swarm::types::Message;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let result = match cli.command {
        Commands::Chat(args) => handle_chat(args.agent).await,
        Commands::Ask(args) => handle_ask(args.agent, args.prompt).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if debug => tracing_subscriber::EnvFilter::new("warn,swarm=debug"),
        Err(_) => tracing_subscriber::EnvFilter::new("warn"),
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok();
}

/// Executor, starting agent, and run options for the given flags.
fn setup(args: &AgentArgs) -> Result<(Swarm, Arc<Agent>, RunOptions), Box<dyn std::error::Error>> {
    let mut config = SwarmConfig::load()?;
    if args.debug {
        config = config.with_debug(true);
    }
    init_tracing(config.debug);

    let swarm = Swarm::from_config(&config)?;

    let mut agent = config.agent(args.name.clone());
    if let Some(ref system) = args.system {
        agent = agent.with_instructions(system.as_str());
    }

    let options = RunOptions {
        context_variables: args.context_variables(),
        model_override: args.model.clone(),
        max_turns: args.max_turns.map(TurnBudget::Limited).unwrap_or_default(),
        execute_tools: true,
        debug: config.debug,
    };

    Ok((swarm, Arc::new(agent), options))
}

async fn handle_chat(args: AgentArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (swarm, agent, options) = setup(&args)?;
    swarm::repl::run_demo_loop(&swarm, agent, options, args.stream).await?;
    Ok(())
}

async fn handle_ask(args: AgentArgs, prompt: String) -> Result<(), Box<dyn std::error::Error>> {
    let (swarm, agent, options) = setup(&args)?;
    let messages = vec![Message::user(prompt)];

    if args.stream {
        let events = swarm.run_stream(agent, messages, options);
        swarm::repl::process_and_print_streaming_response(events).await?;
    } else {
        let response = swarm.run(agent, messages, options).await?;
        swarm::repl::pretty_print_messages(&response.messages);
    }
    Ok(())
}
