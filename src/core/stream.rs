//! Streaming variant of the turn executor.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use uuid::Uuid;

use super::completion::build_request;
use super::dispatch::handle_tool_calls;
use super::response::{Response, RunOptions, StreamEvent};
use super::Swarm;
use crate::agent::Agent;
use crate::error::Result;
use crate::provider::CompletionProvider;
use crate::stream::ChunkMerger;
use crate::types::{CompletionChunk, Message};

impl Swarm {
    /// Like [`run`](Swarm::run), but yields every raw delta as it arrives.
    ///
    /// Each completion is framed by [`StreamEvent::Start`] and
    /// [`StreamEvent::End`]; the last item is [`StreamEvent::Response`]. An
    /// error ends the stream.
    pub fn run_stream(
        &self,
        agent: Arc<Agent>,
        messages: Vec<Message>,
        options: RunOptions,
    ) -> BoxStream<'static, Result<StreamEvent>> {
        let provider = self.provider.clone();
        let (model_override, debug) = self.resolve(&options);
        Box::pin(run_stream_inner(
            provider,
            agent,
            messages,
            options,
            model_override,
            debug,
        ))
    }
}

fn run_stream_inner(
    provider: Arc<dyn CompletionProvider>,
    agent: Arc<Agent>,
    messages: Vec<Message>,
    options: RunOptions,
    model_override: Option<String>,
    debug: bool,
) -> impl Stream<Item = Result<StreamEvent>> + Send + 'static {
    let run_id = Uuid::new_v4();

    async_stream::try_stream! {
        let mut active = agent;
        let mut context_variables = options.context_variables.clone();
        let mut history = messages;
        let start = history.len();
        let mut turns = 0usize;

        while options.max_turns.allows(turns) {
            let (request, registry) = build_request(
                &active,
                &history,
                &context_variables,
                model_override.as_deref(),
                true,
            )?;

            if debug {
                tracing::debug!(
                    %run_id,
                    turn = turns,
                    agent = active.name(),
                    model = %request.model,
                    "streaming completion"
                );
            }

            let mut chunks = provider.stream(&request).await?;
            let mut merger = ChunkMerger::new();
            yield StreamEvent::Start;

            while let Some(chunk) = chunks.next().await {
                match chunk? {
                    CompletionChunk::Delta(delta) => {
                        merger.merge(&delta)?;
                        yield StreamEvent::Delta {
                            sender: active.name().to_string(),
                            delta,
                        };
                    }
                    CompletionChunk::Done { finish_reason } => {
                        if debug {
                            tracing::debug!(%run_id, ?finish_reason, "stream finished");
                        }
                    }
                }
            }
            yield StreamEvent::End;

            let message = merger.finish(active.name())?;
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

        yield StreamEvent::Response(Response {
            messages: history.split_off(start),
            agent: active,
            context_variables,
        });
    }
}
