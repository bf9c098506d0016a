// crates/chat-protocol/src/line_codec.rs

//! Inbound line parser.
//!
//! Input format (one line → at most one command):
//!
//! - Slash command:
//!   `/nick <name>`, `/join <room>`, `/rooms`, `/msg <text...>`, `/help`, `/quit`
//!
//! - Anything not starting with `/` is chat shorthand for `/msg <line>`.
//!
//! Tokens are split on single spaces with no quoting, so two spaces in a
//! row produce an empty token. The whole line is trimmed first; a line
//! that is empty after trimming is ignored.
//!
//! The token list always keeps the command token at index 0, so handler
//! arguments start at index 1.

use chat_core::CommandKind;

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Blank line: no command, no reply.
    Empty,

    /// A recognised command and its tokens (`args[0]` is the command token).
    Command { kind: CommandKind, args: Vec<String> },

    /// A slash token that names no command. Never reaches the dispatcher.
    Unknown(String),
}

/// Parse a single trimmed-or-untrimmed input line.
pub fn parse_line(line: &str) -> ParsedLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ParsedLine::Empty;
    }

    let tokens = split_args(trimmed);

    if !trimmed.starts_with('/') {
        let mut args = Vec::with_capacity(tokens.len() + 1);
        args.push(CommandKind::SendMessage.token().to_string());
        args.extend(tokens);
        return ParsedLine::Command {
            kind: CommandKind::SendMessage,
            args,
        };
    }

    match CommandKind::from_token(&tokens[0]) {
        Some(kind) => ParsedLine::Command { kind, args: tokens },
        None => ParsedLine::Unknown(tokens[0].clone()),
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

/// Split on single spaces. Always yields at least one token.
fn split_args(s: &str) -> Vec<String> {
    s.split(' ').map(str::to_string).collect()
}
