//! chat-protocol
//!
//! Wire-level text handling for the chat server.
//!
//! This crate is responsible for turning input lines into
//! `chat_core` command kinds and `chat_core::ServerLine`s back into
//! text.
//!
//! - [`line_codec`]  : inbound line → [`ParsedLine`]
//! - [`text_format`] : outbound `ServerLine` → text

pub mod line_codec;
pub mod text_format;

pub use line_codec::{parse_line, ParsedLine};
pub use text_format::{format_line, render_line};
