//! Turn executor: completion requests, tool dispatch, and handoffs.

pub mod completion;
pub mod dispatch;
pub mod response;
mod stream;

use std::sync::Arc;

use uuid::Uuid;

use crate::agent::Agent;
use crate::config::{debug_enabled, SwarmConfig};
use crate::error::Result;
use crate::provider::CompletionProvider;
use crate::types::Message;

pub use dispatch::{handle_tool_calls, Dispatched};
pub use response::{Response, RunOptions, StreamEvent, TurnBudget};

/// Runs conversations against a completion provider.
#[derive(Clone)]
pub struct Swarm {
    provider: Arc<dyn CompletionProvider>,
    debug: bool,
}

impl Swarm {
    pub fn new(provider: impl CompletionProvider + 'static) -> Self {
        Self::with_provider(Arc::new(provider))
    }

    pub fn with_provider(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            debug: false,
        }
    }

    /// OpenAI-backed executor from resolved configuration.
    #[cfg(feature = "openai")]
    pub fn from_config(config: &SwarmConfig) -> Result<Self> {
        let provider = crate::provider::OpenAiProvider::from_config(config)?;
        Ok(Self::new(provider).configure(config))
    }

    /// Apply the debug setting of `config`. Agent models are left alone; see
    /// [`SwarmConfig::agent`].
    pub fn configure(mut self, config: &SwarmConfig) -> Self {
        self.debug = config.debug;
        self
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    fn resolve(&self, options: &RunOptions) -> (Option<String>, bool) {
        let model = options.model_override.clone();
        let debug = options.debug || self.debug || debug_enabled();
        (model, debug)
    }

    /// Run the conversation until the agent answers without tool calls, tool
    /// execution is disabled, or the turn budget runs out.
    ///
    /// `messages` and `options.context_variables` belong to this run; the
    /// returned [`Response`] holds only the messages added during it.
    pub async fn run(
        &self,
        agent: Arc<Agent>,
        messages: Vec<Message>,
        options: RunOptions,
    ) -> Result<Response> {
        let run_id = Uuid::new_v4();
        let (model_override, debug) = self.resolve(&options);

        let mut active = agent;
        let mut context_variables = options.context_variables.clone();
        let mut history = messages;
        let start = history.len();
        let mut turns = 0usize;

        if debug {
            tracing::debug!(%run_id, agent = active.name(), "swarm run start");
        }

        while options.max_turns.allows(turns) {
            let (request, registry) = completion::build_request(
                &active,
                &history,
                &context_variables,
                model_override.as_deref(),
                false,
            )?;

            if debug {
                tracing::debug!(
                    %run_id,
                    turn = turns,
                    agent = active.name(),
                    model = %request.model,
                    tools = registry.len(),
                    "requesting completion"
                );
            }

            let message = self.provider.complete(&request).await?.with_sender(active.name());
            turns += 1;

            let tool_calls = message.tool_calls().to_vec();
            history.push(Message::Assistant(message));

            if tool_calls.is_empty() || !options.execute_tools {
                break;
            }

            let dispatched =
                handle_tool_calls(&tool_calls, &registry, &context_variables, run_id, debug)
                    .await?;
            history.extend(dispatched.messages);
            context_variables.merge(&dispatched.context_variables);
            if let Some(next) = dispatched.agent {
                if debug {
                    tracing::debug!(%run_id, from = active.name(), to = next.name(), "handoff");
                }
                active = next;
            }
        }

        if debug {
            tracing::debug!(%run_id, turns, agent = active.name(), "swarm run completed");
        }

        Ok(Response {
            messages: history.split_off(start),
            agent: active,
            context_variables,
        })
    }
}

impl std::fmt::Debug for Swarm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Swarm")
            .field("provider", &self.provider.provider_name())
            .field("debug", &self.debug)
            .finish()
    }
}
