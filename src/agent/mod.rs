//! Agents: named personas the executor runs and hands off between.

#[allow(clippy::module_inception)]
pub mod agent;

pub use agent::{Agent, Instructions, ToolChoice};
