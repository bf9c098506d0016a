//! Error types for command handling.
//!
//! Handlers never panic on short argument lists: every lookup goes
//! through [`Command::arg`](crate::Command::arg), which turns an
//! out-of-range index into [`CommandError::MissingArgument`]. The
//! dispatcher converts any error into a reply for the originating
//! session and moves on to the next command.

use thiserror::Error;

use crate::messages::ServerLine;

/// Why a single command was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Fewer tokens than the handler needs.
    #[error("{command} needs an argument: {command} <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// The argument is present but empty or whitespace only.
    #[error("{command}: <{argument}> must not be blank")]
    BlankArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// Chatting requires a current room.
    #[error("You must join a room first!")]
    NotInRoom,
}

impl CommandError {
    /// Reply sent back to the originating session.
    ///
    /// Argument underflow is a warning; everything else is an error.
    pub fn to_reply(&self) -> ServerLine {
        match self {
            CommandError::MissingArgument { .. } => ServerLine::warning(self.to_string()),
            CommandError::BlankArgument { .. } | CommandError::NotInRoom => {
                ServerLine::error(self.to_string())
            }
        }
    }
}
