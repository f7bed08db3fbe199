//! Session seam consumed by the orchestration core.
//!
//! The scenario only ever talks to [`SessionLike`] and [`ContextLike`], so
//! the scripted doubles in [`crate::testing`] can stand in for the live
//! endpoint. The live implementations below adapt the `bidi-runtime` types
//! to the seam: the tab kind, readiness state, and evaluation ownership the
//! scenario requires are fixed here.

use crate::error::{Result, SmokeError};
use async_trait::async_trait;
use bidi_protocol::{
    ContextKind, EvaluationResult, LogEntry, ReadinessState, ResultOwnership, SharedReference,
};
use bidi_runtime::{BidiContext, BidiSession};
use serde_json::Value;

/// One browsing context, as the scenario sees it.
#[async_trait]
pub trait ContextLike: Send + Sync {
    /// Navigates to `url` and waits for the document load to complete.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Evaluates a synchronous `expression` with root ownership, so a node
    /// result comes back carrying a shared reference.
    async fn evaluate_element(&self, expression: &str) -> Result<EvaluationResult>;

    /// Captures an element-scoped screenshot. The raw payload is handed back
    /// unvalidated; the capture validator decides what to make of it.
    async fn capture_element_screenshot(&self, element: &SharedReference)
    -> Result<Option<Value>>;
}

/// One session, as the scenario sees it.
#[async_trait]
pub trait SessionLike: Send + Sync + Sized {
    type Context: ContextLike;

    /// Opens a new tab.
    async fn new_tab(&self) -> Result<Self::Context>;

    /// Returns the browser log entries buffered so far, in arrival order.
    async fn browser_logs(&self) -> Result<Vec<LogEntry>>;

    /// Terminates the session. Consumes the handle; nothing session-scoped
    /// is usable afterwards.
    async fn end(self) -> Result<()>;
}

#[async_trait]
impl SessionLike for BidiSession {
    type Context = BidiContext;

    async fn new_tab(&self) -> Result<BidiContext> {
        self.new_context(ContextKind::Tab)
            .await
            .map_err(SmokeError::Session)
    }

    async fn browser_logs(&self) -> Result<Vec<LogEntry>> {
        Ok(self.take_browser_logs())
    }

    async fn end(self) -> Result<()> {
        BidiSession::end(self).await.map_err(SmokeError::Session)
    }
}

#[async_trait]
impl ContextLike for BidiContext {
    async fn navigate(&self, url: &str) -> Result<()> {
        BidiContext::navigate(self, url, ReadinessState::Complete)
            .await
            .map(|_| ())
            .map_err(|source| SmokeError::Navigation {
                url: url.to_string(),
                source,
            })
    }

    async fn evaluate_element(&self, expression: &str) -> Result<EvaluationResult> {
        Ok(BidiContext::evaluate(self, expression, false, ResultOwnership::Root).await?)
    }

    async fn capture_element_screenshot(
        &self,
        element: &SharedReference,
    ) -> Result<Option<Value>> {
        let result = BidiContext::capture_element_screenshot(self, element.clone()).await?;
        Ok(result.data)
    }
}
