//! Terminal driver: read user lines, run the swarm, print replies.

use std::io::Write;
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::agent::Agent;
use crate::core::{Response, RunOptions, StreamEvent, Swarm};
use crate::error::{Result, SwarmError};
use crate::types::Message;

const SENDER_COLOR: &str = "\x1b[94m";
const TOOL_COLOR: &str = "\x1b[95m";
const USER_COLOR: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// Render assistant messages and their tool calls for the terminal.
///
/// Tool arguments are shown as `name(key=value, ...)`. Non-assistant
/// messages are skipped.
pub fn format_messages(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        let Some(assistant) = message.as_assistant() else {
            continue;
        };
        let sender = assistant.sender.as_deref().unwrap_or("Assistant");
        out.push_str(&format!("{SENDER_COLOR}{sender}{RESET}:"));
        if let Some(content) = assistant.content.as_deref().filter(|c| !c.is_empty()) {
            out.push(' ');
            out.push_str(content);
        }
        out.push('\n');

        let calls = assistant.tool_calls();
        if calls.len() > 1 {
            out.push('\n');
        }
        for call in calls {
            out.push_str(&format!(
                "{TOOL_COLOR}{}{RESET}({})\n",
                call.name(),
                format_arguments(&call.function.arguments)
            ));
        }
    }
    out
}

fn format_arguments(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
        _ => raw.to_string(),
    }
}

pub fn pretty_print_messages(messages: &[Message]) {
    print!("{}", format_messages(messages));
    let _ = std::io::stdout().flush();
}

/// Print a streamed run as it arrives and return its final response.
pub async fn process_and_print_streaming_response(
    mut events: BoxStream<'static, Result<StreamEvent>>,
) -> Result<Response> {
    let mut stdout = std::io::stdout();
    let mut speaking = false;

    while let Some(event) = events.next().await {
        match event? {
            StreamEvent::Start => speaking = false,
            StreamEvent::Delta { sender, delta } => {
                if let Some(text) = delta.get("content").and_then(|c| c.as_str()) {
                    if !text.is_empty() {
                        if !speaking {
                            let _ = write!(stdout, "{SENDER_COLOR}{sender}{RESET}: ");
                            speaking = true;
                        }
                        let _ = write!(stdout, "{text}");
                    }
                }
                if let Some(calls) = delta.get("tool_calls").and_then(|c| c.as_array()) {
                    for name in calls
                        .iter()
                        .filter_map(|c| c.pointer("/function/name").and_then(|n| n.as_str()))
                        .filter(|n| !n.is_empty())
                    {
                        let _ = writeln!(stdout, "{TOOL_COLOR}{name}{RESET}: calling");
                    }
                }
                let _ = stdout.flush();
            }
            StreamEvent::End => {
                if speaking {
                    let _ = writeln!(stdout);
                }
            }
            StreamEvent::Response(response) => return Ok(response),
        }
    }

    Err(SwarmError::Stream(
        "stream ended without a final response".into(),
    ))
}

/// Interactive loop on stdin until EOF, `exit`, or `quit`.
///
/// History, the active agent, and context variables carry over from one
/// user line to the next.
pub async fn run_demo_loop(
    swarm: &Swarm,
    starting_agent: Arc<Agent>,
    options: RunOptions,
    stream: bool,
) -> Result<()> {
    println!("Starting Swarm CLI 🐝");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut messages: Vec<Message> = Vec::new();
    let mut agent = starting_agent;
    let mut context_variables = options.context_variables.clone();

    loop {
        print!("{USER_COLOR}User{RESET}: ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        messages.push(Message::user(input));
        let run_options = RunOptions {
            context_variables: context_variables.clone(),
            ..options.clone()
        };

        let response = if stream {
            let events = swarm.run_stream(agent.clone(), messages.clone(), run_options);
            process_and_print_streaming_response(events).await?
        } else {
            let response = swarm.run(agent.clone(), messages.clone(), run_options).await?;
            pretty_print_messages(&response.messages);
            response
        };

        messages.extend(response.messages);
        agent = response.agent;
        context_variables = response.context_variables;
    }

    Ok(())
}
