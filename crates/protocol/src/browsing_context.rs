//! Types for the `browsingContext` module.

use crate::script::SharedReference;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of browsing context to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    /// A tab inside an existing window (default)
    #[default]
    Tab,
    /// A new top-level window
    Window,
}

/// Parameters for `browsingContext.create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParams {
    /// Kind of context to open
    #[serde(rename = "type")]
    pub kind: ContextKind,
}

/// Result of `browsingContext.create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResult {
    /// Identifier of the freshly created context
    pub context: String,
}

/// Readiness state to await during navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessState {
    /// Return as soon as the navigation is initiated
    #[default]
    None,
    /// Wait until the document becomes interactive
    Interactive,
    /// Wait until the document load is complete
    Complete,
}

/// Parameters for `browsingContext.navigate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateParams {
    /// Target context identifier
    pub context: String,
    /// URL to navigate to
    pub url: String,
    /// Readiness state the command waits for before resolving
    pub wait: ReadinessState,
}

/// Result of `browsingContext.navigate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateResult {
    /// Navigation identifier, when the navigation created one
    #[serde(default)]
    pub navigation: Option<String>,
    /// URL the context ended up at
    pub url: String,
}

/// Clip region restricting a screenshot capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipRectangle {
    /// Clip to the bounding box of a single element
    Element {
        /// Reference to the element to clip to
        element: SharedReference,
    },
    /// Clip to an explicit viewport-relative box
    Box {
        /// X coordinate of the clip origin
        x: f64,
        /// Y coordinate of the clip origin
        y: f64,
        /// Width of the clip region
        width: f64,
        /// Height of the clip region
        height: f64,
    },
}

/// Parameters for `browsingContext.captureScreenshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureScreenshotParams {
    /// Context to capture from
    pub context: String,
    /// Optional clip restricting the capture area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipRectangle>,
}

/// Result of `browsingContext.captureScreenshot`.
///
/// `data` nominally holds a base64-encoded PNG as a JSON string, but it is
/// kept loose on purpose: a driver that returns nothing, or the wrong shape,
/// must surface to the caller's validation rather than fail decoding here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureScreenshotResult {
    /// Encoded image payload as returned by the driver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
