//! Scripted doubles for the session seam.
//!
//! [`ScriptedSession`] stands in for the live endpoint: configure outcomes
//! with the `set_*`/`fail_*` methods, run the scenario, then assert on the
//! recorded action sequence and termination count. Clones share state, so
//! keep one clone aside before handing the session to the scenario.

use crate::error::{Result, SmokeError};
use crate::session::{ContextLike, SessionLike};
use async_trait::async_trait;
use bidi_protocol::{
    EntryLevel, EvaluationResult, ExceptionDetails, LogEntry, RemoteValue, SharedReference,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A real 1x1 transparent PNG, base64-encoded.
pub const VALID_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

/// What the scripted capture call should produce.
#[derive(Debug, Clone)]
pub enum CaptureScript {
    /// Resolve with this raw payload
    Payload(Value),
    /// Resolve with no payload at all
    Absent,
    /// Fail the capture call outright
    Fail(String),
}

/// Action recorded by [`ScriptedSession`] for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAction {
    NewTab,
    Navigate { url: String },
    Evaluate { expression: String },
    Capture { shared_id: String },
    FetchLogs,
    End,
}

/// An evaluation success carrying a node with the given shared id.
pub fn node_result(shared_id: &str) -> EvaluationResult {
    EvaluationResult::Success {
        result: RemoteValue {
            kind: "node".to_string(),
            shared_id: Some(shared_id.to_string()),
            handle: None,
            value: None,
        },
        realm: "realm-0".to_string(),
    }
}

/// An evaluation exception with the given message text.
pub fn exception_result(text: &str) -> EvaluationResult {
    EvaluationResult::Exception {
        exception_details: ExceptionDetails {
            text: text.to_string(),
            line_number: 1,
            column_number: 1,
            exception: None,
            stack_trace: None,
        },
        realm: "realm-0".to_string(),
    }
}

struct Inner {
    evaluation: Mutex<EvaluationResult>,
    capture: Mutex<CaptureScript>,
    log_entries: Mutex<Vec<LogEntry>>,
    fail_log_fetch: Mutex<bool>,
    fail_navigate: Mutex<bool>,
    fail_end: Mutex<bool>,
    end_count: AtomicUsize,
    actions: Mutex<Vec<ScriptedAction>>,
}

impl Inner {
    fn record(&self, action: ScriptedAction) {
        self.actions.lock().unwrap().push(action);
    }
}

/// Scripted session double. Cheap to clone; all clones share one script and
/// one action log.
#[derive(Clone)]
pub struct ScriptedSession {
    inner: Arc<Inner>,
}

impl ScriptedSession {
    /// A session scripted for the happy path: the element resolves to
    /// `elem-1` and the capture returns a valid PNG payload.
    pub fn happy() -> Self {
        Self {
            inner: Arc::new(Inner {
                evaluation: Mutex::new(node_result("elem-1")),
                capture: Mutex::new(CaptureScript::Payload(json!(VALID_PNG_BASE64))),
                log_entries: Mutex::new(vec![LogEntry {
                    kind: "console".to_string(),
                    level: EntryLevel::Info,
                    text: Some("page loaded".to_string()),
                    timestamp: None,
                }]),
                fail_log_fetch: Mutex::new(false),
                fail_navigate: Mutex::new(false),
                fail_end: Mutex::new(false),
                end_count: AtomicUsize::new(0),
                actions: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Scripts the evaluation outcome.
    pub fn set_evaluation(&self, result: EvaluationResult) {
        *self.inner.evaluation.lock().unwrap() = result;
    }

    /// Scripts the capture outcome.
    pub fn set_capture(&self, script: CaptureScript) {
        *self.inner.capture.lock().unwrap() = script;
    }

    /// Scripts the buffered browser log entries.
    pub fn set_log_entries(&self, entries: Vec<LogEntry>) {
        *self.inner.log_entries.lock().unwrap() = entries;
    }

    /// Makes log retrieval fail.
    pub fn fail_log_fetch(&self) {
        *self.inner.fail_log_fetch.lock().unwrap() = true;
    }

    /// Makes navigation fail.
    pub fn fail_navigate(&self) {
        *self.inner.fail_navigate.lock().unwrap() = true;
    }

    /// Makes session termination fail.
    pub fn fail_end(&self) {
        *self.inner.fail_end.lock().unwrap() = true;
    }

    /// All recorded actions, in order.
    pub fn actions(&self) -> Vec<ScriptedAction> {
        self.inner.actions.lock().unwrap().clone()
    }

    /// How many times the session was terminated.
    pub fn end_count(&self) -> usize {
        self.inner.end_count.load(Ordering::SeqCst)
    }
}

/// Context double handed out by [`ScriptedSession::new_tab`].
pub struct ScriptedContext {
    inner: Arc<Inner>,
}

#[async_trait]
impl SessionLike for ScriptedSession {
    type Context = ScriptedContext;

    async fn new_tab(&self) -> Result<ScriptedContext> {
        self.inner.record(ScriptedAction::NewTab);
        Ok(ScriptedContext {
            inner: Arc::clone(&self.inner),
        })
    }

    async fn browser_logs(&self) -> Result<Vec<LogEntry>> {
        self.inner.record(ScriptedAction::FetchLogs);
        if *self.inner.fail_log_fetch.lock().unwrap() {
            return Err(SmokeError::Runtime(bidi_runtime::Error::Protocol(
                "log buffer unavailable".to_string(),
            )));
        }
        Ok(self.inner.log_entries.lock().unwrap().clone())
    }

    async fn end(self) -> Result<()> {
        self.inner.record(ScriptedAction::End);
        self.inner.end_count.fetch_add(1, Ordering::SeqCst);
        if *self.inner.fail_end.lock().unwrap() {
            return Err(SmokeError::Session(bidi_runtime::Error::ConnectionClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl ContextLike for ScriptedContext {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.inner.record(ScriptedAction::Navigate {
            url: url.to_string(),
        });
        if *self.inner.fail_navigate.lock().unwrap() {
            return Err(SmokeError::Navigation {
                url: url.to_string(),
                source: bidi_runtime::Error::ConnectionClosed,
            });
        }
        Ok(())
    }

    async fn evaluate_element(&self, expression: &str) -> Result<EvaluationResult> {
        self.inner.record(ScriptedAction::Evaluate {
            expression: expression.to_string(),
        });
        Ok(self.inner.evaluation.lock().unwrap().clone())
    }

    async fn capture_element_screenshot(
        &self,
        element: &SharedReference,
    ) -> Result<Option<Value>> {
        self.inner.record(ScriptedAction::Capture {
            shared_id: element.shared_id.clone(),
        });
        match self.inner.capture.lock().unwrap().clone() {
            CaptureScript::Payload(value) => Ok(Some(value)),
            CaptureScript::Absent => Ok(None),
            CaptureScript::Fail(message) => {
                Err(SmokeError::Runtime(bidi_runtime::Error::Protocol(message)))
            }
        }
    }
}
