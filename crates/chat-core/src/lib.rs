//! chat-core
//!
//! Pure chat server logic:
//! - commands and the requests that carry them
//! - client sessions and their outbound channels
//! - rooms and the room registry
//! - the dispatcher that serializes every mutation

pub mod client;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod messages;
pub mod registry;
pub mod room;

pub use client::{ClientId, OutboundRx, OutboundTx, Session};
pub use command::{Command, CommandKind, Request};
pub use dispatcher::Dispatcher;
pub use error::CommandError;
pub use messages::ServerLine;
pub use registry::RoomRegistry;
pub use room::Room;
