#![cfg(feature = "openai")]

use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use swarm::prelude::*;
use swarm::provider::{CompletionRequest, OpenAiProvider};
use swarm::stream::ChunkMerger;
use swarm::types::CompletionChunk;

fn request(stream: bool) -> CompletionRequest {
    CompletionRequest {
        model: "gpt-4o".into(),
        messages: vec![Message::system("Be brief."), Message::user("Hi")],
        tools: None,
        tool_choice: None,
        parallel_tool_calls: None,
        stream,
    }
}

fn sse(events: &[serde_json::Value]) -> String {
    let mut body = String::new();
    for event in events {
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

#[tokio::test]
async fn complete_parses_text_and_tool_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "gpt-4o", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"location\":\"NYC\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", Some(server.uri()));
    let message = provider.complete(&request(false)).await.unwrap();

    assert_eq!(message.content, None);
    assert_eq!(
        message.tool_calls(),
        &[ToolCall::new("call_1", "get_weather", "{\"location\":\"NYC\"}")]
    );
}

#[tokio::test]
async fn http_errors_map_to_swarm_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", Some(server.uri()));
    let err = provider.complete(&request(false)).await.unwrap_err();
    assert!(matches!(err, SwarmError::Authentication(_)));

    let err = provider.complete(&request(false)).await.unwrap_err();
    assert!(matches!(err, SwarmError::Api { status: 500, .. }));
}

#[tokio::test]
async fn stream_yields_raw_deltas_and_stops_at_done() {
    let server = MockServer::start().await;

    let body = sse(&[
        json!({"choices": [{"index": 0, "delta": {"role": "assistant", "content": ""}, "finish_reason": null}]}),
        json!({"choices": [{"index": 0, "delta": {"content": "Hel"}, "finish_reason": null}]}),
        json!({"choices": [{"index": 0, "delta": {"content": "lo"}, "finish_reason": null}]}),
        json!({"choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]}),
    ]);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", Some(server.uri()));
    let chunks: Vec<CompletionChunk> = provider
        .stream(&request(true))
        .await
        .unwrap()
        .map(|c| c.unwrap())
        .collect()
        .await;

    assert_eq!(
        chunks,
        vec![
            CompletionChunk::Delta(json!({"role": "assistant", "content": ""})),
            CompletionChunk::Delta(json!({"content": "Hel"})),
            CompletionChunk::Delta(json!({"content": "lo"})),
            CompletionChunk::Done {
                finish_reason: Some(swarm::types::FinishReason::Stop)
            },
        ]
    );
}

#[tokio::test]
async fn swarm_runs_end_to_end_over_http() {
    let server = MockServer::start().await;

    let tool_turn = sse(&[
        json!({"choices": [{"index": 0, "delta": {"role": "assistant", "content": null, "tool_calls": [
            {"index": 0, "id": "call_1", "type": "function", "function": {"name": "transfer_to_spanish_agent", "arguments": ""}}
        ]}, "finish_reason": null}]}),
        json!({"choices": [{"index": 0, "delta": {"tool_calls": [{"index": 0, "function": {"arguments": "{}"}}]}, "finish_reason": null}]}),
        json!({"choices": [{"index": 0, "delta": {}, "finish_reason": "tool_calls"}]}),
    ]);
    let answer_turn = sse(&[
        json!({"choices": [{"index": 0, "delta": {"role": "assistant", "content": "¡Hola!"}, "finish_reason": null}]}),
        json!({"choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]}),
    ]);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"messages": [{"role": "system", "content": "You only speak English."}]})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(tool_turn, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"messages": [{"role": "system", "content": "Solo hablas español."}]})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(answer_turn, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let spanish = Arc::new(Agent::new("Spanish Agent").with_instructions("Solo hablas español."));
    let target = spanish.clone();
    let english = Arc::new(
        Agent::new("English Agent")
            .with_instructions("You only speak English.")
            .with_function(FunctionSignature::new("transfer_to_spanish_agent"), move |_a, _c| {
                let target = target.clone();
                async move { Ok(target.into()) }
            }),
    );

    let swarm = Swarm::new(OpenAiProvider::new("test-key", Some(server.uri())));
    let mut events = swarm.run_stream(english, vec![Message::user("Hola")], RunOptions::default());

    let mut response = None;
    while let Some(event) = events.next().await {
        if let StreamEvent::Response(r) = event.unwrap() {
            response = Some(r);
        }
    }
    let response = response.unwrap();

    assert!(Agent::same(&response.agent, &spanish));
    assert_eq!(response.messages.len(), 3);
    assert_eq!(response.messages[2].text(), "¡Hola!");
}

/// Serve one streaming response over raw TCP, writing `parts` separately.
async fn serve_in_parts(parts: Vec<Vec<u8>>) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        for part in parts {
            socket.write_all(&part).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn stream_keeps_multibyte_text_split_across_reads() {
    let body = sse(&[json!({"choices": [{"index": 0, "delta": {"content": "こんにちは"}, "finish_reason": null}]})]);
    let bytes = body.into_bytes();
    // One byte into the first three-byte character.
    let cut = bytes.windows(3).position(|w| w == "こ".as_bytes()).unwrap() + 1;
    let base_url = serve_in_parts(vec![bytes[..cut].to_vec(), bytes[cut..].to_vec()]).await;

    let provider = OpenAiProvider::new("test-key", Some(base_url));
    let mut stream = provider.stream(&request(true)).await.unwrap();

    let mut merger = ChunkMerger::new();
    while let Some(chunk) = stream.next().await {
        if let CompletionChunk::Delta(delta) = chunk.unwrap() {
            merger.merge(&delta).unwrap();
        }
    }
    let message = merger.finish("Agent").unwrap();
    assert_eq!(message.content.as_deref(), Some("こんにちは"));
}
