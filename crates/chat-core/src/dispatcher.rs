//! Single consumer of the command queue.
//!
//! The dispatcher owns every session and every room. The server runs it
//! in exactly one task and feeds it [`Request`]s in arrival order, so
//! each request is applied to completion before the next one starts and
//! no lock is needed anywhere.
//!
//! Routing policy:
//! - replies and errors go **only** to the originating session,
//! - join/leave notices and chat lines go to the **other** members of
//!   the affected room.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::client::{ClientId, OutboundTx, Session};
use crate::command::{Command, CommandKind, Request};
use crate::error::CommandError;
use crate::messages::ServerLine;
use crate::registry::RoomRegistry;

/// Sessions plus rooms, mutated one request at a time.
#[derive(Debug, Default)]
pub struct Dispatcher {
    /// Connected clients, keyed by connection id.
    sessions: HashMap<ClientId, Session>,

    /// Room name -> members.
    rooms: RoomRegistry,
}

impl Dispatcher {
    /// Create a dispatcher with no sessions and no rooms.
    pub fn new() -> Self {
        Dispatcher::default()
    }

    /// Apply one request.
    ///
    /// Never fails: a rejected command turns into a reply to the
    /// originating session and the dispatcher is ready for the next one.
    pub fn handle(&mut self, request: Request) {
        match request {
            Request::Connect {
                client,
                nickname,
                sink,
            } => self.connect(client, nickname, sink),
            Request::Command(command) => self.process_command(command),
            Request::Reply { client, line } => self.reply(client, line),
            Request::Disconnect { client } => self.disconnect(client),
        }
    }

    // -------------------------------------------------------------------------
    // Session lifecycle
    // -------------------------------------------------------------------------

    fn connect(&mut self, client: ClientId, nickname: String, sink: OutboundTx) {
        let session = Session::new(client, nickname, sink);
        session.send(ServerLine::info(format!(
            "Welcome! You are known as {}. Type /help for a list of commands.",
            session.nickname()
        )));

        if self.sessions.insert(client, session).is_some() {
            warn!(client = %client, "connect for a client that already had a session");
        }
        debug!(client = %client, sessions = self.sessions.len(), "session registered");
    }

    fn disconnect(&mut self, client: ClientId) {
        if !self.sessions.contains_key(&client) {
            // Already gone via /quit.
            return;
        }

        self.leave_current_room(client);
        self.sessions.remove(&client);
        info!(client = %client, "client disconnected");
    }

    // -------------------------------------------------------------------------
    // Command handlers
    // -------------------------------------------------------------------------

    fn process_command(&mut self, command: Command) {
        let origin = command.origin();
        if !self.sessions.contains_key(&origin) {
            debug!(client = %origin, kind = ?command.kind(), "command from unknown client dropped");
            return;
        }

        let result = match command.kind() {
            CommandKind::SetNick => self.set_nick(&command),
            CommandKind::JoinRoom => self.join_room(&command),
            CommandKind::ListRooms => self.list_rooms(&command),
            CommandKind::SendMessage => self.send_message(&command),
            CommandKind::Help => self.help(&command),
            CommandKind::Quit => self.quit(&command),
        };

        if let Err(err) = result {
            debug!(client = %origin, command = command.kind().token(), error = %err, "command rejected");
            self.reply(origin, err.to_reply());
        }
    }

    fn set_nick(&mut self, command: &Command) -> Result<(), CommandError> {
        let nickname = command.non_blank_arg(1, "name")?;

        if let Some(session) = self.sessions.get_mut(&command.origin()) {
            debug!(client = %command.origin(), from = session.nickname(), to = nickname, "nickname changed");
            session.set_nickname(nickname);
            session.send(ServerLine::info(format!(
                "From now on, you shall be known as {nickname}"
            )));
        }
        Ok(())
    }

    fn join_room(&mut self, command: &Command) -> Result<(), CommandError> {
        let origin = command.origin();
        let room_name = command.non_blank_arg(1, "room")?;

        let Some(session) = self.sessions.get(&origin) else {
            return Ok(());
        };
        if session.room() == Some(room_name) {
            session.send(ServerLine::info(format!("You are already in {room_name}")));
            return Ok(());
        }

        self.leave_current_room(origin);

        self.rooms.get_or_create(room_name).insert(origin);
        let Some(session) = self.sessions.get_mut(&origin) else {
            return Ok(());
        };
        session.set_room(room_name);
        let nickname = session.nickname().to_string();

        if let Some(room) = self.rooms.get(room_name) {
            room.broadcast(
                &self.sessions,
                origin,
                &ServerLine::info(format!("{nickname} has joined the room.")),
            );
        }
        self.reply(
            origin,
            ServerLine::info(format!("Welcome to {room_name}, {nickname}")),
        );
        Ok(())
    }

    fn list_rooms(&mut self, command: &Command) -> Result<(), CommandError> {
        let names = self.rooms.names();
        let line = if names.is_empty() {
            ServerLine::info("There are no rooms yet.")
        } else {
            ServerLine::info(format!("Available rooms are: {}", names.join(", ")))
        };

        self.reply(command.origin(), line);
        Ok(())
    }

    fn send_message(&mut self, command: &Command) -> Result<(), CommandError> {
        let origin = command.origin();
        command.non_blank_arg(1, "text")?;
        let body = command.rest(1);

        let Some(session) = self.sessions.get(&origin) else {
            return Ok(());
        };
        let room_name = session.room().ok_or(CommandError::NotInRoom)?;

        if let Some(room) = self.rooms.get(room_name) {
            let line = ServerLine::info(format!("{}: {}", session.nickname(), body));
            room.broadcast(&self.sessions, origin, &line);
        }
        Ok(())
    }

    fn help(&mut self, command: &Command) -> Result<(), CommandError> {
        self.reply(command.origin(), ServerLine::info("Help:"));
        for kind in CommandKind::ALL {
            let (usage, description) = kind.usage();
            self.reply(
                command.origin(),
                ServerLine::info(format!("{usage:<14}{description}")),
            );
        }
        Ok(())
    }

    fn quit(&mut self, command: &Command) -> Result<(), CommandError> {
        let origin = command.origin();

        self.leave_current_room(origin);
        if let Some(session) = self.sessions.remove(&origin) {
            session.send(ServerLine::info("See you later :)"));
            session.send(ServerLine::Close);
        }

        info!(client = %origin, "client quit");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Remove `client` from its room, if any, and tell the remaining members.
    fn leave_current_room(&mut self, client: ClientId) {
        let Some(session) = self.sessions.get_mut(&client) else {
            return;
        };
        let Some(room_name) = session.take_room() else {
            return;
        };
        let nickname = session.nickname().to_string();

        if let Some(room) = self.rooms.get_mut(&room_name) {
            room.remove(client);
            room.broadcast(
                &self.sessions,
                client,
                &ServerLine::info(format!("{nickname} has left the room.")),
            );
        }
    }

    fn reply(&self, client: ClientId, line: ServerLine) {
        if let Some(session) = self.sessions.get(&client) {
            session.send(line);
        }
    }

    // -------------------------------------------------------------------------
    // Queries (tests / admin)
    // -------------------------------------------------------------------------

    /// Number of connected sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of rooms ever created.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// All room names, in unspecified order.
    pub fn room_names(&self) -> Vec<&str> {
        self.rooms.names()
    }

    /// Members of `room`, or `None` if no such room exists.
    pub fn room_members(&self, room: &str) -> Option<Vec<ClientId>> {
        self.rooms.get(room).map(|room| room.members().collect())
    }

    /// The room `client` is currently in.
    pub fn room_of(&self, client: ClientId) -> Option<&str> {
        self.sessions.get(&client).and_then(Session::room)
    }

    pub fn nickname_of(&self, client: ClientId) -> Option<&str> {
        self.sessions.get(&client).map(Session::nickname)
    }
}
