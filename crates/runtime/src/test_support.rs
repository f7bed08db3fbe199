//! Channel-backed transport fakes for connection-level tests.

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::transport::{TransportParts, TransportReceiver, TransportSender};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;

struct ChannelSender {
    tx: mpsc::UnboundedSender<String>,
}

impl TransportSender for ChannelSender {
    fn send(&mut self, text: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let outcome = self.tx.send(text).map_err(|_| Error::ConnectionClosed);
        Box::pin(async move { outcome })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }
}

struct ChannelReceiver {
    rx: mpsc::UnboundedReceiver<String>,
}

impl TransportReceiver for ChannelReceiver {
    fn next_message(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>> {
        Box::pin(async move { Ok(self.rx.recv().await) })
    }
}

/// A connection wired to in-memory channels.
///
/// Frames the connection writes arrive on the returned receiver; frames sent
/// on the returned sender reach the connection's reader task. Dropping the
/// sender looks like a peer disconnect.
pub(crate) fn fake_connection() -> (
    Arc<Connection>,
    mpsc::UnboundedReceiver<String>,
    mpsc::UnboundedSender<String>,
) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();

    let parts = TransportParts {
        sender: Box::new(ChannelSender { tx: out_tx }),
        receiver: Box::new(ChannelReceiver { rx: in_rx }),
    };

    (Connection::new(parts), out_rx, in_tx)
}
