//! Shared test helpers and mock provider.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{json, Value};

use swarm::error::Result;
use swarm::provider::{CompletionProvider, CompletionRequest};
use swarm::types::{AssistantMessage, CompletionChunk, FinishReason, ToolCall};

/// A mock provider that returns canned assistant messages in order and
/// records every request it receives.
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<Vec<AssistantMessage>>,
    raw_streams: Mutex<Vec<Vec<Value>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain text reply.
    pub fn queue_response(&self, text: &str) {
        self.queue_message(AssistantMessage::text(text));
    }

    /// Queue a reply carrying one tool call.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: Value) {
        self.queue_tool_calls(vec![ToolCall::new(id, name, args.to_string())]);
    }

    /// Queue a reply carrying several tool calls and no text.
    pub fn queue_tool_calls(&self, calls: Vec<ToolCall>) {
        self.queue_message(AssistantMessage::default().with_tool_calls(calls));
    }

    pub fn queue_message(&self, message: AssistantMessage) {
        self.responses.lock().unwrap().push(message);
    }

    /// Queue raw deltas for the next streamed completion, sent as-is.
    pub fn queue_deltas(&self, deltas: Vec<Value>) {
        self.raw_streams.lock().unwrap().push(deltas);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next(&self, request: &CompletionRequest) -> AssistantMessage {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            AssistantMessage::text("Mock response")
        } else {
            responses.remove(0)
        }
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<AssistantMessage> {
        Ok(self.next(request))
    }

    async fn stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<CompletionChunk>>> {
        let raw = {
            let mut raw_streams = self.raw_streams.lock().unwrap();
            (!raw_streams.is_empty()).then(|| raw_streams.remove(0))
        };
        let (deltas, finish_reason) = match raw {
            Some(deltas) => {
                self.requests.lock().unwrap().push(request.clone());
                (deltas, FinishReason::Stop)
            }
            None => {
                let message = self.next(request);
                let finish_reason = if message.has_tool_calls() {
                    FinishReason::ToolCalls
                } else {
                    FinishReason::Stop
                };
                (fragments(&message), finish_reason)
            }
        };

        let stream = async_stream::stream! {
            for delta in deltas {
                yield Ok(CompletionChunk::Delta(delta));
            }
            yield Ok(CompletionChunk::Done { finish_reason: Some(finish_reason) });
        };

        Ok(Box::pin(stream))
    }
}

/// Split a message into deltas the way chat-completions streams do: a role
/// delta, content in 5-character pieces, then each tool call as a header
/// fragment followed by 4-character argument pieces.
pub fn fragments(message: &AssistantMessage) -> Vec<Value> {
    let mut out = vec![json!({"role": "assistant", "content": null})];

    if let Some(content) = message.content.as_deref() {
        for piece in chunks(content, 5) {
            out.push(json!({ "content": piece }));
        }
    }

    for (index, call) in message.tool_calls().iter().enumerate() {
        out.push(json!({
            "tool_calls": [{
                "index": index,
                "id": call.id,
                "type": "function",
                "function": { "name": call.function.name, "arguments": "" },
            }]
        }));
        for piece in chunks(&call.function.arguments, 4) {
            out.push(json!({
                "tool_calls": [{ "index": index, "function": { "arguments": piece } }]
            }));
        }
    }

    out
}

fn chunks(text: &str, size: usize) -> Vec<String> {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(size)
        .map(|c| c.iter().collect())
        .collect()
}
