//! Client identity and per-connection session state.

use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;

use crate::messages::ServerLine;

/// Identifier for a connected client.
///
/// This is intentionally opaque; we just guarantee uniqueness
/// over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outbound lines from the dispatcher to a given client.
pub type OutboundTx = mpsc::UnboundedSender<ServerLine>;
pub type OutboundRx = mpsc::UnboundedReceiver<ServerLine>;

/// Server-side state for one connected user.
///
/// Only the dispatcher mutates a session. `room` is the name of the
/// room the session currently belongs to; the room itself is owned by
/// the dispatcher's registry.
#[derive(Debug)]
pub struct Session {
    id: ClientId,
    nickname: String,
    room: Option<String>,
    sink: OutboundTx,
}

impl Session {
    pub fn new(id: ClientId, nickname: impl Into<String>, sink: OutboundTx) -> Self {
        Session {
            id,
            nickname: nickname.into(),
            room: None,
            sink,
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub(crate) fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    pub(crate) fn set_room(&mut self, room: impl Into<String>) {
        self.room = Some(room.into());
    }

    pub(crate) fn take_room(&mut self) -> Option<String> {
        self.room.take()
    }

    /// Queue a line for this session's connection.
    ///
    /// Returns `false` if the connection's writer is already gone; the
    /// line is dropped and the caller carries on.
    pub fn send(&self, line: ServerLine) -> bool {
        match self.sink.send(line) {
            Ok(()) => true,
            Err(_) => {
                debug!(client = %self.id, "outbound channel closed, dropping line");
                false
            }
        }
    }
}
