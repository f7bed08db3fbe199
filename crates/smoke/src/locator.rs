//! Element resolution via in-page script evaluation.

use crate::error::{Result, SmokeError};
use crate::session::ContextLike;
use bidi_protocol::{EvaluationResult, SharedReference};
use tracing::info;

/// Resolves `expression` to an element reference in the given context.
///
/// One attempt, no retries: anything but a success result carrying a
/// `sharedId` aborts the scenario.
pub async fn resolve_element<C: ContextLike>(
    context: &C,
    expression: &str,
) -> Result<SharedReference> {
    info!(target = "smoke", expression, "locating element");

    match context.evaluate_element(expression).await? {
        EvaluationResult::Success { result, .. } => match result.shared_id {
            Some(shared_id) => {
                info!(target = "smoke", %shared_id, "element resolved");
                Ok(SharedReference::new(shared_id))
            }
            None => Err(SmokeError::ElementLookup {
                detail: format!(
                    "evaluation succeeded but produced a {} value with no element reference",
                    result.kind
                ),
            }),
        },
        EvaluationResult::Exception {
            exception_details, ..
        } => Err(SmokeError::ElementLookup {
            detail: exception_details.text,
        }),
    }
}
