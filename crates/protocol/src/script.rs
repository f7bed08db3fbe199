//! Types for the `script` module.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Realm target for script evaluation.
///
/// Only context targets are used here; the driver resolves the context's
/// default realm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Context whose default realm runs the expression
    pub context: String,
}

/// Ownership model for values returned by evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOwnership {
    /// Return handles rooted in the realm, keeping remote objects alive
    Root,
    /// Return plain serialized values without handles (default)
    #[default]
    None,
}

/// Parameters for `script.evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    /// Expression source text
    pub expression: String,
    /// Realm target to evaluate in
    pub target: Target,
    /// Whether to await a promise-valued result before resolving
    pub await_promise: bool,
    /// Ownership model for the returned value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_ownership: Option<ResultOwnership>,
}

/// Opaque reference to a DOM node, valid only within the browsing context
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedReference {
    /// Driver-issued shared identifier
    pub shared_id: String,
    /// Strong handle, present when ownership was "root"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

impl SharedReference {
    /// Creates a reference from a bare shared identifier.
    pub fn new(shared_id: impl Into<String>) -> Self {
        Self {
            shared_id: shared_id.into(),
            handle: None,
        }
    }
}

/// Serialized remote value, as nested inside evaluation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteValue {
    /// Remote value type tag (e.g. "node", "string", "undefined")
    #[serde(rename = "type")]
    pub kind: String,
    /// Shared identifier, present for node values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_id: Option<String>,
    /// Strong handle, present when ownership was "root"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Plain serialized value, present for primitive types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Details of a script exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    /// Exception message text
    pub text: String,
    /// Line the exception was raised on
    pub line_number: u32,
    /// Column the exception was raised on
    pub column_number: u32,
    /// Thrown value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<RemoteValue>,
    /// Call frames leading to the throw; kept loose, only printed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<Value>,
}

/// Tagged result of evaluating an expression.
///
/// Only the success arm can yield a usable element reference; everything
/// else is a hard evaluation failure for callers that need one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EvaluationResult {
    /// The expression completed and produced a value
    Success {
        /// Resolved value
        result: RemoteValue,
        /// Realm the evaluation ran in
        realm: String,
    },
    /// The expression threw
    Exception {
        /// Details of the thrown exception
        #[serde(rename = "exceptionDetails")]
        exception_details: ExceptionDetails,
        /// Realm the evaluation ran in
        realm: String,
    },
}
