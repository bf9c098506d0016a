//! Outbound formatting (`ServerLine` → wire text).
//!
//! - Info:    `<text>`
//! - Warning: `WARN: <text>`
//! - Error:   `ERR: <text>`
//!
//! Every line ends with `\n`. With a prompt configured, the line is
//! written as `\r<line>\n<prompt>` so an interactive terminal redraws
//! the prompt after each message.

use chat_core::ServerLine;

/// Format a line without terminator. `None` for [`ServerLine::Close`].
pub fn format_line(line: &ServerLine) -> Option<String> {
    match line {
        ServerLine::Info(text) => Some(text.clone()),
        ServerLine::Warning(text) => Some(format!("WARN: {text}")),
        ServerLine::Error(text) => Some(format!("ERR: {text}")),
        ServerLine::Close => None,
    }
}

/// Bytes to write for `line`, including terminator and optional prompt.
pub fn render_line(line: &ServerLine, prompt: Option<&str>) -> Option<String> {
    let text = format_line(line)?;
    Some(match prompt {
        Some(prompt) => format!("\r{text}\n{prompt}"),
        None => format!("{text}\n"),
    })
}
