//! Hub protocol envelope handling
//!
//! Builds the subscribe/keepalive control message and normalizes the observed
//! inbound envelope shapes into flat sequences of [`RawEvent`]s. No one shape
//! is authoritative; deployments have been seen emitting all three.

use crate::CodecError;
use chrono::Utc;
use serde_json::{json, Value};
use types::{parse, RawEvent};

/// Hub name used in the subscribe message.
pub const HUB_NAME: &str = "Streaming";

/// Hub descriptor sent as the `connectionData` query parameter.
pub const HUB_DATA: &str = r#"[{"name":"Streaming"}]"#;

/// Build the subscription control message. Sent once after connect and
/// periodically afterwards as the keepalive probe.
///
/// Shape: `{"H": <hub>, "M": "Subscribe", "A": [[<topic>, ...]], "I": <seq>}`
pub fn subscribe_message(hub: &str, topics: &[&str], sequence: u64) -> Value {
    json!({
        "H": hub,
        "M": "Subscribe",
        "A": [topics],
        "I": sequence,
    })
}

/// Normalize one inbound frame into a flat, ordered sequence of raw events.
///
/// Accepted shapes:
/// - flat envelope: `{"Type": t, "Json": p, "DateTime": ts}`
/// - array of flat envelopes
/// - hub bundle: `{"M": [{"M": "feed", "A": [t, p, ts]}, ...]}`
/// - initial-state map: `{"R": {t: p, ...}}`
/// - control/keepalive objects (e.g. `{}`) normalize to an empty batch
///
/// Returns an error only when the frame is not valid JSON; unknown topics and
/// odd payloads inside a well-formed frame still become raw events.
pub fn normalize_frame(text: &str) -> Result<Vec<RawEvent>, CodecError> {
    let frame: Value = serde_json::from_str(text)?;
    let mut events = Vec::new();

    match frame {
        Value::Array(entries) => {
            for entry in entries {
                push_flat(&mut events, &entry);
            }
        }
        Value::Object(obj) => {
            if let Some(Value::Object(state)) = obj.get("R") {
                for (topic, payload) in state {
                    events.push(RawEvent::now(topic.clone(), payload.clone()));
                }
            }
            if let Some(Value::Array(bundle)) = obj.get("M") {
                for entry in bundle {
                    push_hub_entry(&mut events, entry);
                }
            }
            if obj.contains_key("Type") {
                push_flat(&mut events, &Value::Object(obj));
            }
        }
        // Scalars are not messages; nothing to emit.
        _ => {}
    }

    Ok(events)
}

/// A flat `{Type, Json, DateTime}` envelope. Entries without a `Type` string
/// are control messages and emit nothing.
fn push_flat(events: &mut Vec<RawEvent>, entry: &Value) {
    let Some(topic) = entry.get("Type").and_then(Value::as_str) else {
        return;
    };
    let payload = entry.get("Json").cloned().unwrap_or(Value::Null);
    let received_at = parse::parse_utc(entry.get("DateTime")).unwrap_or_else(Utc::now);
    events.push(RawEvent::at(topic, payload, received_at));
}

/// A hub bundle entry: `{"H": hub, "M": method, "A": [topic, payload, ts?]}`.
fn push_hub_entry(events: &mut Vec<RawEvent>, entry: &Value) {
    let Some(Value::Array(args)) = entry.get("A") else {
        return;
    };
    let Some(topic) = args.first().and_then(Value::as_str) else {
        return;
    };
    let payload = args.get(1).cloned().unwrap_or(Value::Null);
    let received_at = parse::parse_utc(args.get(2)).unwrap_or_else(Utc::now);
    events.push(RawEvent::at(topic, payload, received_at));
}
