//! WebDriver BiDi connection, session, and driver lifecycle.
//!
//! This crate realizes the remote endpoint the capture harness talks to:
//!
//! - [`transport`]: WebSocket transport split into sender/receiver halves
//! - [`connection`]: command/response correlation and event buffering
//! - [`session`]: the session and browsing-context operations
//! - [`driver`]: launching and reaping the local driver process
//!
//! The harness consumes [`BidiSession`] and [`BidiContext`] through its own
//! trait seam; everything below that lives here.

pub mod connection;
pub mod driver;
pub mod error;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use connection::Connection;
pub use driver::DriverServer;
pub use error::{Error, Result};
pub use session::{BidiContext, BidiSession, SessionConfig};
pub use transport::WebSocketTransport;
