//! Types for the `session` module.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for `session.new`.
///
/// The capabilities blob is kept as raw JSON: its contents (binary paths,
/// vendor options, logging prefs) are assembled by the caller and passed
/// through to the driver without interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionParams {
    /// WebDriver capabilities request
    pub capabilities: Value,
}

/// Result of `session.new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResult {
    /// Driver-assigned session identifier
    pub session_id: String,
    /// Capabilities the driver actually matched
    #[serde(default)]
    pub capabilities: Value,
}

/// Parameters for `session.subscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeParams {
    /// Event names to subscribe to (e.g. "log.entryAdded")
    pub events: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_session_result_deserializes() {
        let raw = json!({
            "sessionId": "7f2a",
            "capabilities": {"browserName": "chrome", "webSocketUrl": true}
        });

        let result: NewSessionResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.session_id, "7f2a");
        assert_eq!(result.capabilities["browserName"], "chrome");
    }

    #[test]
    fn subscribe_params_serialize() {
        let params = SubscribeParams {
            events: vec!["log.entryAdded".to_string()],
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({"events": ["log.entryAdded"]}));
    }
}
