//! Wire types for the WebDriver BiDi protocol.
//!
//! This crate contains the serde-serializable types used for communication
//! with a BiDi-capable browser driver over a WebSocket. These types represent
//! the "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **1:1 with protocol**: Match the WebDriver BiDi module schemas
//! - **Stable**: Changes only when the wire protocol changes
//!
//! The connection and session layers are built on top of these types in
//! `bidi-runtime`.

pub mod browsing_context;
pub mod log;
pub mod message;
pub mod script;
pub mod session;

pub use browsing_context::*;
pub use log::*;
pub use message::*;
pub use script::*;
pub use session::*;
