//! Scenario-level error taxonomy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SmokeError>;

/// Primary failures of the capture scenario.
///
/// Diagnostic-retrieval problems never appear here; they are swallowed at
/// their call sites and only ever printed.
#[derive(Debug, Error)]
pub enum SmokeError {
    /// The session could not be established or torn down.
    #[error("session lifecycle failure")]
    Session(#[source] bidi_runtime::Error),

    /// Navigation did not reach the requested readiness state.
    #[error("navigation to {url} failed")]
    Navigation {
        url: String,
        #[source]
        source: bidi_runtime::Error,
    },

    /// Evaluation did not yield a usable element reference.
    #[error("element lookup failed: {detail}")]
    ElementLookup { detail: String },

    /// The capture response was missing or had the wrong shape. Worded to
    /// stand apart from an ordinary failed capture: a well-behaved driver
    /// never answers this way.
    #[error(
        "screenshot payload is {detail}; this looks like a protocol regression in the driver, not an empty capture"
    )]
    CaptureShape { detail: String },

    /// The capture decoded but does not start with the PNG signature.
    #[error("screenshot signature mismatch: expected prefix {expected:?}, got {found:?}")]
    SignatureMismatch {
        expected: &'static str,
        found: String,
    },

    /// Any other endpoint failure, passed through unchanged.
    #[error(transparent)]
    Runtime(#[from] bidi_runtime::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_shape_errors_name_a_regression() {
        let err = SmokeError::CaptureShape {
            detail: "absent".to_string(),
        };
        assert!(err.to_string().contains("regression"));
    }

    #[test]
    fn signature_mismatch_shows_both_sides() {
        let err = SmokeError::SignatureMismatch {
            expected: "iVBOR",
            found: "abcde".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("iVBOR"));
        assert!(text.contains("abcde"));
    }
}
