//! Run options, turn budget, and run results.

use std::sync::Arc;

use bon::Builder;

use crate::agent::Agent;
use crate::context::ContextVariables;
use crate::types::Message;

/// Maximum number of completion round-trips in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnBudget {
    #[default]
    Unbounded,
    Limited(usize),
}

impl TurnBudget {
    /// Whether another request may be issued after `turns` completed ones.
    pub fn allows(&self, turns: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Limited(max) => turns < *max,
        }
    }
}

impl From<usize> for TurnBudget {
    fn from(max: usize) -> Self {
        Self::Limited(max)
    }
}

/// Per-run settings.
///
/// ```
/// use swarm::core::{RunOptions, TurnBudget};
/// use swarm::context::ContextVariables;
///
/// let options = RunOptions::builder()
///     .context_variables(ContextVariables::new().with("user_id", 123))
///     .max_turns(TurnBudget::Limited(4))
///     .build();
/// assert!(options.execute_tools);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct RunOptions {
    /// Initial shared state; copied, never mutated.
    #[builder(default)]
    pub context_variables: ContextVariables,
    /// Replaces every agent's model for this run.
    #[builder(into)]
    pub model_override: Option<String>,
    #[builder(default)]
    pub max_turns: TurnBudget,
    /// When false the run stops at the first assistant message.
    #[builder(default = true)]
    pub execute_tools: bool,
    /// Log each request and tool call at debug level.
    #[builder(default)]
    pub debug: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            context_variables: ContextVariables::default(),
            model_override: None,
            max_turns: TurnBudget::Unbounded,
            execute_tools: true,
            debug: false,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct Response {
    /// Messages appended during the run, in order.
    pub messages: Vec<Message>,
    /// The agent active when the run ended.
    pub agent: Arc<Agent>,
    /// Final shared state.
    pub context_variables: ContextVariables,
}

impl Response {
    /// Text of the last assistant message, if any.
    pub fn last_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find_map(|m| m.as_assistant())
            .and_then(|a| a.content.as_deref())
    }
}

/// Events of a streamed run.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A completion stream is about to be consumed.
    Start,
    /// One raw delta, tagged with the speaking agent's name.
    Delta {
        sender: String,
        delta: serde_json::Value,
    },
    /// The completion stream finished.
    End,
    /// Final snapshot; always the last event of a successful run.
    Response(Response),
}
