//! Command/response correlation layer for the BiDi connection.
//!
//! This module implements the request/response correlation layer on top of
//! the transport. It handles:
//! - Generating unique command IDs
//! - Correlating responses with pending commands
//! - Distinguishing events from responses
//! - Buffering `log.entryAdded` events for later retrieval
//!
//! # Message Flow
//!
//! 1. Client calls `send_command()` with method and params
//! 2. Connection generates a unique ID and creates a oneshot channel
//! 3. The command is serialized and queued for the writer task
//! 4. Client awaits on the oneshot receiver
//! 5. The reader task receives a frame from the transport
//! 6. Responses are correlated by ID and completed via the oneshot channel;
//!    subscribed events are buffered

use crate::error::{Error, Result};
use crate::transport::{TransportParts, TransportReceiver, TransportSender};
use bidi_protocol::{Command, ErrorResponse, LogEntry, Message};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Pending command callbacks keyed by command ID.
type CallbackMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

/// Frames queued for the writer task.
enum Outbound {
    /// A serialized command to put on the wire
    Frame(String),
    /// Close the transport and stop writing
    Shutdown,
}

/// RAII guard ensuring callback cleanup when a command future is dropped.
struct CancelGuard {
    id: u64,
    callbacks: CallbackMap,
    completed: bool,
}

impl CancelGuard {
    fn new(id: u64, callbacks: CallbackMap) -> Self {
        Self {
            id,
            callbacks,
            completed: false,
        }
    }

    fn complete(&mut self) {
        self.completed = true;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        if self.callbacks.lock().remove(&self.id).is_some() {
            tracing::debug!(id = self.id, "removed orphaned callback");
        }
    }
}

/// BiDi connection to a driver.
///
/// Manages command/response correlation and event buffering. Uses sequential
/// command IDs and oneshot channels for correlation. The reader and writer
/// tasks are spawned on construction, so a Tokio runtime must be running.
pub struct Connection {
    /// Sequential command ID counter
    last_id: AtomicU64,
    /// Pending command callbacks keyed by command ID
    callbacks: CallbackMap,
    /// Queue feeding the writer task
    outbound_tx: mpsc::UnboundedSender<Outbound>,
    /// Buffered `log.entryAdded` payloads, in arrival order
    log_entries: Mutex<Vec<LogEntry>>,
    /// Set once the connection is closing or closed
    closed: AtomicBool,
    /// Reader task handle, taken on close
    reader: Mutex<Option<JoinHandle<()>>>,
    /// Writer task handle, taken on close
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl Connection {
    /// Create a connection over the given transport parts and start its
    /// reader and writer tasks.
    pub fn new(parts: TransportParts) -> Arc<Self> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let connection = Arc::new(Self {
            last_id: AtomicU64::new(0),
            callbacks: Arc::new(Mutex::new(HashMap::new())),
            outbound_tx,
            log_entries: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            reader: Mutex::new(None),
            writer: Mutex::new(None),
        });

        let writer = tokio::spawn(write_loop(outbound_rx, parts.sender));
        let reader = tokio::spawn(read_loop(Arc::clone(&connection), parts.receiver));

        *connection.writer.lock() = Some(writer);
        *connection.reader.lock() = Some(reader);

        connection
    }

    /// Sends a command to the driver and awaits its response.
    pub async fn send_command(&self, method: &str, params: Value) -> Result<Value> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::ConnectionClosed);
        }

        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;

        let (tx, rx) = oneshot::channel();
        self.callbacks.lock().insert(id, tx);
        let mut guard = CancelGuard::new(id, Arc::clone(&self.callbacks));

        // close() or a reader disconnect may have drained the callback map
        // between the check above and the insert; a callback registered after
        // the drain would never complete. The guard removes it on return.
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::ConnectionClosed);
        }

        let frame = serde_json::to_string(&Command {
            id,
            method: method.to_string(),
            params,
        })?;
        tracing::debug!(id, method, "send command");

        if self.outbound_tx.send(Outbound::Frame(frame)).is_err() {
            return Err(Error::ConnectionClosed);
        }

        let result = rx.await;
        guard.complete();
        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::ConnectionClosed),
        }
    }

    /// Takes every buffered browser log entry, in arrival order.
    pub fn take_log_entries(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.log_entries.lock())
    }

    /// Close the connection: stop the writer, cancel the reader, and fail
    /// every outstanding command with [`Error::ConnectionClosed`].
    ///
    /// Idempotent; later calls are no-ops.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let _ = self.outbound_tx.send(Outbound::Shutdown);
        let writer = self.writer.lock().take();
        if let Some(handle) = writer {
            let _ = handle.await;
        }

        let reader = self.reader.lock().take();
        if let Some(handle) = reader {
            handle.abort();
            let _ = handle.await;
        }

        self.fail_pending();
        tracing::debug!("connection closed");
    }

    fn dispatch(&self, message: Message) {
        match message {
            Message::Success(response) => {
                self.complete(response.id, Ok(response.result));
            }
            Message::Error(response) => match response.id {
                Some(id) => {
                    let error = remote_error(response);
                    self.complete(id, Err(error));
                }
                None => {
                    tracing::warn!(
                        error = %response.error,
                        message = %response.message,
                        "driver reported a connection-level error"
                    );
                }
            },
            Message::Event(event) => {
                if event.method == "log.entryAdded" {
                    match serde_json::from_value::<LogEntry>(event.params) {
                        Ok(entry) => self.log_entries.lock().push(entry),
                        Err(err) => {
                            tracing::warn!(error = %err, "unparseable log.entryAdded payload");
                        }
                    }
                } else {
                    tracing::trace!(method = %event.method, "unhandled event");
                }
            }
        }
    }

    fn complete(&self, id: u64, outcome: Result<Value>) {
        match self.callbacks.lock().remove(&id) {
            Some(callback) => {
                let _ = callback.send(outcome);
            }
            None => tracing::warn!(id, "response for unknown command"),
        }
    }

    fn fail_pending(&self) {
        let pending: Vec<_> = self.callbacks.lock().drain().collect();
        for (id, callback) in pending {
            tracing::debug!(id, "failing pending command: connection closed");
            let _ = callback.send(Err(Error::ConnectionClosed));
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.callbacks.lock().len()
    }
}

async fn write_loop(
    mut outbound_rx: mpsc::UnboundedReceiver<Outbound>,
    mut sender: Box<dyn TransportSender>,
) {
    while let Some(outbound) = outbound_rx.recv().await {
        match outbound {
            Outbound::Frame(frame) => {
                if let Err(err) = sender.send(frame).await {
                    tracing::error!(error = %err, "transport write error");
                    break;
                }
            }
            Outbound::Shutdown => {
                if let Err(err) = sender.close().await {
                    tracing::debug!(error = %err, "transport close error");
                }
                break;
            }
        }
    }
}

async fn read_loop(connection: Arc<Connection>, mut receiver: Box<dyn TransportReceiver>) {
    loop {
        match receiver.next_message().await {
            Ok(Some(frame)) => match serde_json::from_str::<Message>(&frame) {
                Ok(message) => connection.dispatch(message),
                Err(err) => tracing::warn!(error = %err, "unparseable frame"),
            },
            Ok(None) => break,
            Err(err) => {
                tracing::error!(error = %err, "transport read error");
                break;
            }
        }
    }

    connection.closed.store(true, Ordering::SeqCst);
    connection.fail_pending();
}

fn remote_error(response: ErrorResponse) -> Error {
    Error::Remote {
        error: response.error,
        message: response.message,
        stacktrace: response.stacktrace,
    }
}
