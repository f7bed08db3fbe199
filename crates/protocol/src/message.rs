//! Message envelopes exchanged with the driver.
//!
//! Every frame on the wire is one of three shapes, discriminated by the
//! `type` field: a success response, an error response, or an event. Outgoing
//! frames are always commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol command sent to the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Unique command ID for correlating responses
    pub id: u64,
    /// Method name to invoke (e.g. "browsingContext.navigate")
    pub method: String,
    /// Method parameters as a JSON object
    pub params: Value,
}

/// Successful command response from the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Command ID this response correlates to
    pub id: u64,
    /// Method result as a JSON object
    #[serde(default)]
    pub result: Value,
}

/// Error response from the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Command ID this error correlates to; absent for connection-level errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Stable error code (e.g. "invalid argument", "no such frame")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Stack trace from the driver, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

/// Event emitted by the driver for a subscribed module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event method name (e.g. "log.entryAdded")
    pub method: String,
    /// Event payload as a JSON object
    pub params: Value,
}

/// Discriminated union of incoming protocol messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Success response (`"type": "success"`)
    Success(CommandResponse),
    /// Error response (`"type": "error"`)
    Error(ErrorResponse),
    /// Event (`"type": "event"`)
    Event(Event),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_serializes_flat() {
        let command = Command {
            id: 3,
            method: "session.status".to_string(),
            params: json!({}),
        };

        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(
            value,
            json!({"id": 3, "method": "session.status", "params": {}})
        );
    }

    #[test]
    fn success_response_deserializes() {
        let raw = r#"{"type":"success","id":7,"result":{"context":"ctx-1"}}"#;

        let message: Message = serde_json::from_str(raw).unwrap();
        match message {
            Message::Success(response) => {
                assert_eq!(response.id, 7);
                assert_eq!(response.result, json!({"context": "ctx-1"}));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn error_response_deserializes_without_stacktrace() {
        let raw = r#"{"type":"error","id":2,"error":"unknown command","message":"nope"}"#;

        let message: Message = serde_json::from_str(raw).unwrap();
        match message {
            Message::Error(response) => {
                assert_eq!(response.id, Some(2));
                assert_eq!(response.error, "unknown command");
                assert_eq!(response.message, "nope");
                assert!(response.stacktrace.is_none());
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn event_deserializes() {
        let raw = r#"{"type":"event","method":"log.entryAdded","params":{"level":"info"}}"#;

        let message: Message = serde_json::from_str(raw).unwrap();
        match message {
            Message::Event(event) => {
                assert_eq!(event.method, "log.entryAdded");
                assert_eq!(event.params, json!({"level": "info"}));
            }
            other => panic!("expected event, got {other:?}"),
        }
    }
}
