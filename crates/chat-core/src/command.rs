//! Commands and the requests that carry them to the dispatcher.

use crate::client::{ClientId, OutboundTx};
use crate::error::CommandError;
use crate::messages::ServerLine;

/// What a command asks the dispatcher to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    SetNick,
    JoinRoom,
    ListRooms,
    SendMessage,
    Help,
    Quit,
}

impl CommandKind {
    /// Every kind, in the order `/help` lists them.
    pub const ALL: [CommandKind; 6] = [
        CommandKind::SetNick,
        CommandKind::JoinRoom,
        CommandKind::ListRooms,
        CommandKind::SendMessage,
        CommandKind::Help,
        CommandKind::Quit,
    ];

    /// Slash token selecting this kind.
    pub fn token(self) -> &'static str {
        match self {
            CommandKind::SetNick => "/nick",
            CommandKind::JoinRoom => "/join",
            CommandKind::ListRooms => "/rooms",
            CommandKind::SendMessage => "/msg",
            CommandKind::Help => "/help",
            CommandKind::Quit => "/quit",
        }
    }

    /// Exact, case-sensitive match on the slash token.
    pub fn from_token(token: &str) -> Option<Self> {
        CommandKind::ALL.into_iter().find(|kind| kind.token() == token)
    }

    /// Usage synopsis and one-line description for `/help`.
    pub fn usage(self) -> (&'static str, &'static str) {
        match self {
            CommandKind::SetNick => ("/nick <name>", "Set a nickname"),
            CommandKind::JoinRoom => ("/join <room>", "Join a room, leaving the current one"),
            CommandKind::ListRooms => ("/rooms", "List available rooms"),
            CommandKind::SendMessage => ("/msg <text>", "Talk in the current room"),
            CommandKind::Help => ("/help", "Show this help"),
            CommandKind::Quit => ("/quit", "Disconnect"),
        }
    }
}

/// One parsed input line, queued for the dispatcher.
///
/// `args[0]` is the command token itself; arguments start at index 1.
/// Fields are private so a command cannot change after it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    origin: ClientId,
    args: Vec<String>,
}

impl Command {
    pub fn new(kind: CommandKind, origin: ClientId, args: Vec<String>) -> Self {
        Command { kind, origin, args }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn origin(&self) -> ClientId {
        self.origin
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Argument at `index`, or `MissingArgument` naming it `name`.
    pub fn arg(&self, index: usize, name: &'static str) -> Result<&str, CommandError> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or(CommandError::MissingArgument {
                command: self.kind.token(),
                argument: name,
            })
    }

    /// Like [`Command::arg`], but also rejects blank values.
    pub fn non_blank_arg(&self, index: usize, name: &'static str) -> Result<&str, CommandError> {
        let value = self.arg(index, name)?;
        if value.trim().is_empty() {
            return Err(CommandError::BlankArgument {
                command: self.kind.token(),
                argument: name,
            });
        }
        Ok(value)
    }

    /// Arguments from `index` onwards, re-joined with single spaces.
    pub fn rest(&self, index: usize) -> String {
        self.args.get(index..).unwrap_or_default().join(" ")
    }
}

/// Item on the dispatcher queue.
#[derive(Debug)]
pub enum Request {
    /// A connection was accepted; register its session.
    Connect {
        client: ClientId,
        nickname: String,
        sink: OutboundTx,
    },

    /// A command parsed from one of the client's lines.
    Command(Command),

    /// A line rejected before it became a command (e.g. an unknown
    /// slash token). Relayed verbatim to the client so it stays in
    /// order with replies to the client's earlier commands.
    Reply { client: ClientId, line: ServerLine },

    /// The connection closed without `/quit` (EOF or I/O error).
    Disconnect { client: ClientId },
}
