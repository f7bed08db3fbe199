//! WebSocket transport for the BiDi connection.
//!
//! The connection layer owns the two halves of a transport independently: a
//! sender it hands to its writer task and a receiver it hands to its reader
//! task. Both halves are trait objects so tests can substitute channel-backed
//! fakes for the real WebSocket.

use crate::error::{Error, Result};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::pin::Pin;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Outbound half of a transport.
pub trait TransportSender: Send {
    /// Send one text frame.
    fn send(&mut self, text: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Flush and close the outbound side.
    fn close(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Inbound half of a transport.
pub trait TransportReceiver: Send {
    /// Receive the next text frame; `None` means the peer closed.
    fn next_message(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>>;
}

/// The two halves of a connected transport.
pub struct TransportParts {
    /// Outbound half, owned by the connection's writer task
    pub sender: Box<dyn TransportSender>,
    /// Inbound half, owned by the connection's reader task
    pub receiver: Box<dyn TransportReceiver>,
}

/// WebSocket transport connecting to a driver's BiDi endpoint.
pub struct WebSocketTransport;

impl WebSocketTransport {
    /// Connect to the given `ws://` URL and split into transport parts.
    pub async fn connect(url: &str) -> Result<TransportParts> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|err| Error::ConnectionFailed(format!("{url}: {err}")))?;
        tracing::debug!(url, "websocket connected");

        let (sink, stream) = stream.split();
        Ok(TransportParts {
            sender: Box::new(WebSocketTransportSender { sink }),
            receiver: Box::new(WebSocketTransportReceiver { stream }),
        })
    }
}

/// Outbound WebSocket half.
pub struct WebSocketTransportSender {
    sink: SplitSink<WsStream, WsMessage>,
}

impl TransportSender for WebSocketTransportSender {
    fn send(&mut self, text: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.sink.send(WsMessage::Text(text)).await?;
            Ok(())
        })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.sink.close().await?;
            Ok(())
        })
    }
}

/// Inbound WebSocket half.
pub struct WebSocketTransportReceiver {
    stream: SplitStream<WsStream>,
}

impl TransportReceiver for WebSocketTransportReceiver {
    fn next_message(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>> {
        Box::pin(async move {
            loop {
                match self.stream.next().await {
                    Some(Ok(frame)) => match classify(frame) {
                        Frame::Text(text) => return Ok(Some(text)),
                        Frame::Ignored => continue,
                        Frame::End => return Ok(None),
                    },
                    Some(Err(err)) => return Err(err.into()),
                    None => return Ok(None),
                }
            }
        })
    }
}

/// What to do with one received WebSocket frame.
enum Frame {
    /// A text payload to hand to the connection
    Text(String),
    /// A control frame the protocol layer never sees
    Ignored,
    /// The peer is closing
    End,
}

fn classify(frame: WsMessage) -> Frame {
    match frame {
        WsMessage::Text(text) => Frame::Text(text),
        // BiDi is text-only; a binary frame is driver misbehavior we skip.
        WsMessage::Binary(bytes) => {
            tracing::warn!(len = bytes.len(), "ignoring unexpected binary frame");
            Frame::Ignored
        }
        WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => Frame::Ignored,
        WsMessage::Close(_) => Frame::End,
    }
}
