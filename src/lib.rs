//! Swarm: lightweight multi-agent orchestration.
//!
//! Runs multi-turn conversations between a user and cooperating agents. Each
//! agent is a named persona (instructions + callable tools) backed by a
//! chat-completion endpoint. The [`core::Swarm`] executor requests
//! completions, dispatches tool calls, merges context updates, and hands
//! control to another agent when a tool returns one.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use swarm::prelude::*;
//!
//! # async fn example() -> swarm::error::Result<()> {
//! let config = SwarmConfig::from_env();
//! let swarm = Swarm::from_config(&config)?;
//! let agent = Arc::new(Agent::new("Helper").with_instructions("Be brief."));
//!
//! let response = swarm
//!     .run(agent, vec![Message::user("Hi!")], RunOptions::default())
//!     .await?;
//! println!("{}", response.messages.last().map(|m| m.text()).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod stream;
pub mod tools;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub mod repl;
