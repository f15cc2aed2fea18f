//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::config::SwarmConfig;
use crate::error::{Result, SwarmError};
use crate::types::{AssistantMessage, CompletionChunk, FinishReason, Message, ToolCall};

use super::http::{
    bearer_headers, decode_utf8_chunk, parse_sse_line, shared_client, status_to_error, SseLine,
};
use super::{CompletionProvider, CompletionRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions client for OpenAI and compatible endpoints.
#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from resolved configuration; the API key is required.
    pub fn from_config(config: &SwarmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| SwarmError::Authentication("Missing OPENAI_API_KEY".into()))?;
        Ok(Self::new(api_key, config.base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub(crate) fn build_request_body(request: &CompletionRequest) -> Result<serde_json::Value> {
        let messages = request
            .messages
            .iter()
            .map(message_to_openai)
            .collect::<Result<Vec<_>>>()?;

        let mut body = serde_json::Map::new();
        body.insert("model".into(), request.model.clone().into());
        body.insert("messages".into(), messages.into());

        if let Some(ref tools) = request.tools {
            body.insert("tools".into(), serde_json::to_value(tools)?);
        }
        if let Some(ref choice) = request.tool_choice {
            body.insert("tool_choice".into(), choice.to_value());
        }
        if let Some(parallel) = request.parallel_tool_calls {
            body.insert("parallel_tool_calls".into(), parallel.into());
        }
        body.insert("stream".into(), request.stream.into());

        Ok(serde_json::Value::Object(body))
    }

    async fn post(&self, request: &CompletionRequest) -> Result<reqwest::Response> {
        let body = Self::build_request_body(request)?;

        let resp = shared_client()
            .post(self.endpoint())
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }
        Ok(resp)
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<AssistantMessage> {
        debug!(model = %request.model, messages = request.messages.len(), "OpenAI complete");

        let data: OpenAiChatResponse = self.post(request).await?.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SwarmError::api(200, "No choices in OpenAI response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall::new(tc.id, tc.function.name, tc.function.arguments))
            .collect();

        Ok(AssistantMessage {
            content: choice.message.content,
            tool_calls: None,
            sender: None,
        }
        .with_tool_calls(tool_calls))
    }

    async fn stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<CompletionChunk>>> {
        debug!(model = %request.model, messages = request.messages.len(), "OpenAI stream");

        let byte_stream = self.post(request).await?.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();
            let mut pending = Vec::new();
            futures::pin_mut!(byte_stream);

            'read: while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(SwarmError::Network(e));
                        break;
                    }
                };

                decode_utf8_chunk(&mut pending, &chunk, &mut buffer);

                while let Some(line_end) = buffer.find('\n') {
                    let line: String = buffer.drain(..=line_end).collect();
                    let line = line.trim();

                    let data = match parse_sse_line(line) {
                        SseLine::Data(data) => data,
                        SseLine::Done => break 'read,
                        SseLine::Ignored => continue,
                    };

                    let chunk = match serde_json::from_str::<OpenAiStreamChunk>(data) {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            debug!(error = %e, "skipping unparseable stream chunk");
                            continue;
                        }
                    };

                    if let Some(choice) = chunk.choices.into_iter().next() {
                        let has_fields = choice.delta.as_object().is_some_and(|d| !d.is_empty());
                        if has_fields {
                            yield Ok(CompletionChunk::Delta(choice.delta));
                        }
                        if let Some(reason) = choice.finish_reason {
                            yield Ok(CompletionChunk::Done {
                                finish_reason: reason.parse::<FinishReason>().ok(),
                            });
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Wire form of a history message; local-only fields are dropped.
fn message_to_openai(message: &Message) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(message)?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("sender");
        obj.remove("tool_name");
    }
    Ok(value)
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Deserialize)]
struct OpenAiStreamChoice {
    #[serde(default)]
    delta: serde_json::Value,
    finish_reason: Option<String>,
}
