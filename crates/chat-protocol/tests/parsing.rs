// crates/chat-protocol/tests/parsing.rs
use chat_core::{CommandKind, ServerLine};
use chat_protocol::{format_line, parse_line, render_line, ParsedLine};

fn command(line: &str) -> (CommandKind, Vec<String>) {
    match parse_line(line) {
        ParsedLine::Command { kind, args } => (kind, args),
        other => panic!("expected a command for {line:?}, got {other:?}"),
    }
}

#[test]
fn slash_tokens_select_kind() {
    let cases = [
        ("/nick alice", CommandKind::SetNick),
        ("/join lobby", CommandKind::JoinRoom),
        ("/rooms", CommandKind::ListRooms),
        ("/msg hi there", CommandKind::SendMessage),
        ("/help", CommandKind::Help),
        ("/quit", CommandKind::Quit),
    ];

    for (line, expected) in cases {
        let (kind, args) = command(line);
        assert_eq!(kind, expected, "line {line:?}");
        assert_eq!(args[0], expected.token());
    }
}

#[test]
fn arguments_follow_the_command_token() {
    let (_, args) = command("/msg hello big world");
    assert_eq!(args, vec!["/msg", "hello", "big", "world"]);

    let (_, args) = command("/join");
    assert_eq!(args, vec!["/join"]);
}

#[test]
fn plain_text_is_message_shorthand() {
    let (kind, args) = command("hello everyone");
    assert_eq!(kind, CommandKind::SendMessage);
    assert_eq!(args, vec!["/msg", "hello", "everyone"]);
}

#[test]
fn unknown_slash_command_is_rejected() {
    assert_eq!(parse_line("/foo bar"), ParsedLine::Unknown("/foo".to_string()));
    // Matching is case-sensitive.
    assert_eq!(parse_line("/NICK bob"), ParsedLine::Unknown("/NICK".to_string()));
}

#[test]
fn blank_lines_are_ignored() {
    assert_eq!(parse_line(""), ParsedLine::Empty);
    assert_eq!(parse_line("   "), ParsedLine::Empty);
    assert_eq!(parse_line("\r\n"), ParsedLine::Empty);
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let (kind, args) = command("  /nick bob\r\n");
    assert_eq!(kind, CommandKind::SetNick);
    assert_eq!(args, vec!["/nick", "bob"]);

    let (kind, args) = command("  hi");
    assert_eq!(kind, CommandKind::SendMessage);
    assert_eq!(args, vec!["/msg", "hi"]);
}

#[test]
fn double_space_yields_empty_token() {
    let (_, args) = command("/join  lobby");
    assert_eq!(args, vec!["/join", "", "lobby"]);
}

#[test]
fn outbound_prefixes() {
    assert_eq!(format_line(&ServerLine::info("hi")).as_deref(), Some("hi"));
    assert_eq!(
        format_line(&ServerLine::warning("careful")).as_deref(),
        Some("WARN: careful")
    );
    assert_eq!(
        format_line(&ServerLine::error("Unknown command: /foo")).as_deref(),
        Some("ERR: Unknown command: /foo")
    );
    assert_eq!(format_line(&ServerLine::Close), None);
}

#[test]
fn render_with_and_without_prompt() {
    let line = ServerLine::info("bob: hi");
    assert_eq!(render_line(&line, None).as_deref(), Some("bob: hi\n"));
    assert_eq!(
        render_line(&line, Some("> ")).as_deref(),
        Some("\rbob: hi\n> ")
    );
    assert_eq!(render_line(&ServerLine::Close, Some("> ")), None);
}
