//! Reassembly of streamed deltas.

mod common;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use swarm::error::SwarmError;
use swarm::stream::ChunkMerger;
use swarm::types::{AssistantMessage, ToolCall};

fn final_message() -> AssistantMessage {
    AssistantMessage::text("Checking both cities now.")
        .with_tool_calls(vec![
            ToolCall::new("call_a", "get_weather", r#"{"location": "New York"}"#),
            ToolCall::new("call_b", "get_weather", r#"{"location": "Paris"}"#),
        ])
        .with_sender("Weather Agent")
}

fn merge_all(deltas: &[Value]) -> AssistantMessage {
    let mut merger = ChunkMerger::new();
    for delta in deltas {
        merger.merge(delta).unwrap();
    }
    merger.finish("Weather Agent").unwrap()
}

#[test]
fn any_content_split_reconstructs_message() {
    let expected = final_message();
    let content = expected.content.clone().unwrap();

    for split in 0..=content.len() {
        let (head, tail) = content.split_at(split);
        let mut deltas = vec![
            json!({"role": "assistant", "content": head}),
            json!({"content": tail}),
        ];
        for (index, call) in expected.tool_calls().iter().enumerate() {
            deltas.push(json!({"tool_calls": [{
                "index": index, "id": call.id, "type": "function",
                "function": {"name": call.function.name, "arguments": call.function.arguments},
            }]}));
        }
        assert_eq!(merge_all(&deltas), expected, "content split at {split}");
    }
}

#[test]
fn any_argument_split_reconstructs_message() {
    let expected = final_message();

    for (target, call) in expected.tool_calls().iter().enumerate() {
        let args = &call.function.arguments;
        for split in 0..=args.len() {
            let (head, tail) = args.split_at(split);
            let mut deltas = vec![json!({"role": "assistant", "content": expected.content})];
            for (index, other) in expected.tool_calls().iter().enumerate() {
                let first = if index == target { head } else { other.function.arguments.as_str() };
                deltas.push(json!({"tool_calls": [{
                    "index": index, "id": other.id, "type": "function",
                    "function": {"name": other.function.name, "arguments": first},
                }]}));
                if index == target {
                    deltas.push(json!({"tool_calls": [{"index": index, "function": {"arguments": tail}}]}));
                }
            }
            assert_eq!(merge_all(&deltas), expected, "call {target} split at {split}");
        }
    }
}

#[test]
fn fine_grained_stream_reconstructs_message() {
    let expected = final_message();
    assert_eq!(merge_all(&common::fragments(&expected)), expected);
}

#[test]
fn interleaved_tool_call_fragments_are_grouped_by_index() {
    let deltas = vec![
        json!({"tool_calls": [{"index": 0, "id": "call_a", "type": "function", "function": {"name": "get_", "arguments": ""}}]}),
        json!({"tool_calls": [{"index": 1, "id": "call_b", "type": "function", "function": {"name": "get_time", "arguments": "{}"}}]}),
        json!({"tool_calls": [{"index": 0, "function": {"name": "weather", "arguments": "{\"location\": \"Oslo\"}"}}]}),
    ];

    let message = merge_all(&deltas);
    assert_eq!(message.content, None);
    assert_eq!(
        message.tool_calls(),
        &[
            ToolCall::new("call_a", "get_weather", "{\"location\": \"Oslo\"}"),
            ToolCall::new("call_b", "get_time", "{}"),
        ]
    );
}

#[test]
fn malformed_deltas_are_rejected() {
    let cases = [
        json!(["not", "an", "object"]),
        json!({"tool_calls": "call"}),
        json!({"tool_calls": [{"function": {"name": "x"}}]}),
        json!({"tool_calls": [{"index": -1}]}),
    ];
    for delta in cases {
        let err = ChunkMerger::new().merge(&delta).unwrap_err();
        assert!(matches!(err, SwarmError::MalformedDelta(_)), "{delta}");
    }
}
