//! Element screenshot capture and validation.

use crate::config::PNG_BASE64_PREFIX;
use crate::diagnostics;
use crate::error::{Result, SmokeError};
use crate::session::{ContextLike, SessionLike};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bidi_protocol::SharedReference;
use serde_json::Value;
use tracing::{info, warn};

/// Captures a screenshot of `element` and validates it, printing the browser
/// log buffer afterwards whichever way the validation goes.
pub async fn capture_and_verify<S: SessionLike>(
    session: &S,
    context: &S::Context,
    element: &SharedReference,
) -> Result<()> {
    match verify(context, element).await {
        Ok(()) => {
            diagnostics::print_session_logs(session).await;
            Ok(())
        }
        Err(err) => {
            // Best-effort: whatever the browser logged may explain the
            // failure. The capture error propagates either way.
            diagnostics::print_session_logs(session).await;
            Err(err)
        }
    }
}

async fn verify<C: ContextLike>(context: &C, element: &SharedReference) -> Result<()> {
    let response = context.capture_element_screenshot(element).await?;

    // Stage one: the payload must exist and be an encoded string at all.
    let data = match response {
        Some(Value::String(data)) => data,
        Some(other) => {
            return Err(SmokeError::CaptureShape {
                detail: format!("a JSON {} instead of an encoded string", json_kind(&other)),
            });
        }
        None => {
            return Err(SmokeError::CaptureShape {
                detail: "missing entirely".to_string(),
            });
        }
    };

    println!("capture response: {data}");
    let prefix = extracted_prefix(&data);
    println!("capture prefix: {prefix}");

    // Stage two: the first five encoded characters are the PNG signature.
    if prefix != PNG_BASE64_PREFIX {
        return Err(SmokeError::SignatureMismatch {
            expected: PNG_BASE64_PREFIX,
            found: prefix,
        });
    }

    match BASE64.decode(data.as_bytes()) {
        Ok(bytes) => {
            info!(target = "smoke", decoded_len = bytes.len(), "screenshot verified");
        }
        Err(err) => {
            warn!(
                target = "smoke",
                error = %err,
                "signature prefix matched but the payload does not decode cleanly"
            );
        }
    }
    Ok(())
}

fn extracted_prefix(data: &str) -> String {
    data.chars().take(5).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
