//! Shared types for the chat TCP server.
//!
//! Channel aliases between connection tasks and the dispatcher task.
//! The outbound (`OutboundTx`) side is defined in `chat-core`, since
//! sessions own it.

use tokio::sync::mpsc;

use chat_core::Request;

/// Channel from connection tasks → dispatcher task.
///
/// Bounded: a connection whose send does not fit waits until the
/// dispatcher catches up.
pub type RequestTx = mpsc::Sender<Request>;
pub type RequestRx = mpsc::Receiver<Request>;
