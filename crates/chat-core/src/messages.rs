//! Outbound lines produced by the dispatcher.
//!
//! These are **transport-agnostic**: the server decides how each
//! variant is rendered on the wire (see `chat-protocol`).

/// One line of output for a single session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine {
    /// Plain text: replies, room notices and chat lines.
    Info(String),

    /// Recoverable problem with the request, e.g. a missing argument.
    Warning(String),

    /// Rejected request or violated precondition.
    Error(String),

    /// Flush everything queued before this item, then close the connection.
    Close,
}

impl ServerLine {
    pub fn info(text: impl Into<String>) -> Self {
        ServerLine::Info(text.into())
    }

    pub fn warning(text: impl Into<String>) -> Self {
        ServerLine::Warning(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        ServerLine::Error(text.into())
    }

    /// Text payload, or `None` for [`ServerLine::Close`].
    pub fn text(&self) -> Option<&str> {
        match self {
            ServerLine::Info(text) | ServerLine::Warning(text) | ServerLine::Error(text) => {
                Some(text.as_str())
            }
            ServerLine::Close => None,
        }
    }
}
