//! chat-server
//!
//! Multi-client async TCP server for the multi-room chat.

pub mod config;
pub mod nickname;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod client;
mod dispatcher_task;
