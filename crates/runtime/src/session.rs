//! BiDi session and browsing-context operations.
//!
//! [`BidiSession::connect`] establishes the WebSocket connection, negotiates
//! `session.new` from an opaque [`SessionConfig`], and subscribes to browser
//! log events. [`BidiContext`] carries the per-context operations the harness
//! drives: navigate, evaluate, capture.

use crate::connection::Connection;
use crate::error::Result;
use crate::transport::WebSocketTransport;
use bidi_protocol::{
    CaptureScreenshotParams, CaptureScreenshotResult, ClipRectangle, ContextKind, CreateParams,
    CreateResult, EvaluateParams, EvaluationResult, LogEntry, NavigateParams, NavigateResult,
    NewSessionParams, NewSessionResult, ReadinessState, ResultOwnership, SharedReference,
    SubscribeParams, Target,
};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;

/// Opaque session-construction parameters.
///
/// The harness assembles this from its environment and hands it over
/// uninterpreted; only [`SessionConfig::capabilities`] knows how the pieces
/// land in the WebDriver capabilities blob.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// BiDi endpoint URL of a running driver (e.g. `ws://127.0.0.1:9515/session`)
    pub websocket_url: String,
    /// Browser executable to launch, or the driver's default when absent
    pub browser_binary: Option<PathBuf>,
    /// Extra command-line arguments for the browser
    pub browser_args: Vec<String>,
    /// Ask the browser to log everything it can
    pub verbose_logging: bool,
    /// Request a BiDi-capable session
    pub enable_bidi: bool,
}

impl SessionConfig {
    /// Builds the `session.new` capabilities request.
    pub fn capabilities(&self) -> Value {
        let mut always_match = serde_json::Map::new();
        always_match.insert("webSocketUrl".to_string(), Value::Bool(self.enable_bidi));

        if self.verbose_logging {
            always_match.insert("goog:loggingPrefs".to_string(), json!({"browser": "ALL"}));
        }

        let mut chrome_options = serde_json::Map::new();
        if let Some(binary) = &self.browser_binary {
            chrome_options.insert(
                "binary".to_string(),
                Value::String(binary.display().to_string()),
            );
        }
        if !self.browser_args.is_empty() {
            chrome_options.insert("args".to_string(), json!(self.browser_args));
        }
        if !chrome_options.is_empty() {
            always_match.insert(
                "goog:chromeOptions".to_string(),
                Value::Object(chrome_options),
            );
        }

        json!({"alwaysMatch": always_match})
    }
}

/// An established BiDi session.
///
/// Owns the connection for its lifetime; [`BidiSession::end`] terminates the
/// remote session and closes the connection, consuming the handle so the
/// session cannot be used afterwards.
pub struct BidiSession {
    connection: Arc<Connection>,
    session_id: String,
}

impl BidiSession {
    /// Connects to the driver, creates a session, and subscribes to
    /// `log.entryAdded` so browser logs buffer from the start.
    pub async fn connect(config: &SessionConfig) -> Result<Self> {
        let parts = WebSocketTransport::connect(&config.websocket_url).await?;
        let connection = Connection::new(parts);

        let params = NewSessionParams {
            capabilities: config.capabilities(),
        };
        let result = match connection
            .send_command("session.new", serde_json::to_value(&params)?)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                connection.close().await;
                return Err(err);
            }
        };
        let session: NewSessionResult = serde_json::from_value(result)?;
        tracing::info!(session_id = %session.session_id, "session established");

        let subscribe = SubscribeParams {
            events: vec!["log.entryAdded".to_string()],
        };
        if let Err(err) = connection
            .send_command("session.subscribe", serde_json::to_value(&subscribe)?)
            .await
        {
            connection.close().await;
            return Err(err);
        }

        Ok(Self {
            connection,
            session_id: session.session_id,
        })
    }

    /// Driver-assigned session identifier.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Opens a new browsing context of the given kind.
    pub async fn new_context(&self, kind: ContextKind) -> Result<BidiContext> {
        let params = CreateParams { kind };
        let result = self
            .connection
            .send_command("browsingContext.create", serde_json::to_value(&params)?)
            .await?;
        let created: CreateResult = serde_json::from_value(result)?;
        tracing::debug!(context = %created.context, "browsing context created");

        Ok(BidiContext {
            connection: Arc::clone(&self.connection),
            context: created.context,
        })
    }

    /// Takes every browser log entry buffered so far, in arrival order.
    pub fn take_browser_logs(&self) -> Vec<LogEntry> {
        self.connection.take_log_entries()
    }

    /// Ends the session and closes the connection.
    ///
    /// The connection is closed even when `session.end` fails; the command's
    /// outcome is what gets reported.
    pub async fn end(self) -> Result<()> {
        let outcome = self.connection.send_command("session.end", json!({})).await;
        self.connection.close().await;
        outcome.map(|_| ())
    }
}

/// One navigable surface within a session.
///
/// Holds its own handle on the connection, but the session's lifetime still
/// bounds its usefulness: once the session ends, every command here fails
/// with a closed-connection error.
pub struct BidiContext {
    connection: Arc<Connection>,
    context: String,
}

impl BidiContext {
    /// Context identifier as issued by the driver.
    pub fn id(&self) -> &str {
        &self.context
    }

    /// Navigates to `url`, resolving once the requested readiness state is
    /// reached.
    pub async fn navigate(&self, url: &str, wait: ReadinessState) -> Result<NavigateResult> {
        let params = NavigateParams {
            context: self.context.clone(),
            url: url.to_string(),
            wait,
        };
        let result = self
            .connection
            .send_command("browsingContext.navigate", serde_json::to_value(&params)?)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Evaluates an expression in the context's default realm.
    pub async fn evaluate(
        &self,
        expression: &str,
        await_promise: bool,
        ownership: ResultOwnership,
    ) -> Result<EvaluationResult> {
        let params = EvaluateParams {
            expression: expression.to_string(),
            target: Target {
                context: self.context.clone(),
            },
            await_promise,
            result_ownership: Some(ownership),
        };
        let result = self
            .connection
            .send_command("script.evaluate", serde_json::to_value(&params)?)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Captures a screenshot clipped to the given element.
    pub async fn capture_element_screenshot(
        &self,
        element: SharedReference,
    ) -> Result<CaptureScreenshotResult> {
        let params = CaptureScreenshotParams {
            context: self.context.clone(),
            clip: Some(ClipRectangle::Element { element }),
        };
        let result = self
            .connection
            .send_command(
                "browsingContext.captureScreenshot",
                serde_json::to_value(&params)?,
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}
