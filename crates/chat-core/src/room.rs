//! Named broadcast group.
//!
//! A room only stores member ids. Sessions live in the dispatcher's
//! session table, so broadcasting needs that table to find each
//! member's outbound channel.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::client::{ClientId, Session};
use crate::messages::ServerLine;

/// A named set of currently-joined clients.
#[derive(Debug, Clone)]
pub struct Room {
    name: String,
    members: HashSet<ClientId>,
}

impl Room {
    /// Create an empty room.
    pub fn new(name: impl Into<String>) -> Self {
        Room {
            name: name.into(),
            members: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.members.iter().copied()
    }

    pub fn contains(&self, client: ClientId) -> bool {
        self.members.contains(&client)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn insert(&mut self, client: ClientId) -> bool {
        self.members.insert(client)
    }

    pub(crate) fn remove(&mut self, client: ClientId) -> bool {
        self.members.remove(&client)
    }

    /// Send `line` to every member except `sender`.
    ///
    /// A member whose channel is closed (or who has no session) is
    /// skipped; delivery to the others continues. Returns how many
    /// members the line was queued for.
    pub fn broadcast(
        &self,
        sessions: &HashMap<ClientId, Session>,
        sender: ClientId,
        line: &ServerLine,
    ) -> usize {
        let mut delivered = 0;

        for member in self.members.iter().filter(|&&id| id != sender) {
            match sessions.get(member) {
                Some(session) => {
                    if session.send(line.clone()) {
                        delivered += 1;
                    }
                }
                None => {
                    debug!(room = %self.name, client = %member, "member has no session, skipping");
                }
            }
        }

        delivered
    }
}
