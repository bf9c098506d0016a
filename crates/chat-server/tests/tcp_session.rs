// crates/chat-server/tests/tcp_session.rs
use std::net::SocketAddr;
use std::time::Duration;

use chat_server::config::Config;
use chat_server::server;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, LinesCodec};

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(200);

async fn start_server(config: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, config));
    addr
}

struct TestClient {
    lines: FramedRead<OwnedReadHalf, LinesCodec>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connect and consume the greeting.
    async fn connect(addr: SocketAddr) -> Self {
        let mut client = Self::connect_raw(addr).await;
        let greeting = client.next_line().await;
        assert!(greeting.starts_with("Welcome!"), "greeting was {greeting:?}");
        client
    }

    async fn connect_raw(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        TestClient {
            lines: FramedRead::new(read_half, LinesCodec::new()),
            writer,
        }
    }

    /// Connect, set `nick` and join `room`, consuming the replies.
    async fn join_as(addr: SocketAddr, nick: &str, room: &str) -> Self {
        let mut client = Self::connect(addr).await;
        client.send(&format!("/nick {nick}")).await;
        client.expect(&format!("From now on, you shall be known as {nick}")).await;
        client.send(&format!("/join {room}")).await;
        client.expect(&format!("Welcome to {room}, {nick}")).await;
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .unwrap();
    }

    async fn next_line(&mut self) -> String {
        timeout(WAIT, self.lines.next())
            .await
            .expect("timed out waiting for a line")
            .expect("connection closed")
            .expect("bad line")
    }

    async fn expect(&mut self, want: &str) {
        assert_eq!(self.next_line().await, want);
    }

    async fn expect_nothing(&mut self) {
        if let Ok(Some(line)) = timeout(QUIET, self.lines.next()).await {
            panic!("unexpected line {line:?}");
        }
    }

    async fn expect_closed(&mut self) {
        let next = timeout(WAIT, self.lines.next())
            .await
            .expect("timed out waiting for close");
        assert!(next.is_none(), "expected close, got {next:?}");
    }
}

fn local_config() -> Config {
    Config {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        ..Config::default()
    }
}

#[tokio::test]
async fn chat_between_two_clients() {
    let addr = start_server(local_config()).await;

    let mut alice = TestClient::join_as(addr, "alice", "lobby").await;
    let mut bob = TestClient::join_as(addr, "bob", "lobby").await;
    alice.expect("bob has joined the room.").await;

    alice.send("/msg hello").await;
    bob.expect("alice: hello").await;

    bob.send("hi alice").await;
    alice.expect("bob: hi alice").await;

    alice.expect_nothing().await;
    bob.expect_nothing().await;
}

#[tokio::test]
async fn unknown_command_gets_error_reply() {
    let addr = start_server(local_config()).await;
    let mut client = TestClient::connect(addr).await;

    client.send("/foo").await;
    client.expect("ERR: Unknown command: /foo").await;

    // Connection stays usable.
    client.send("/rooms").await;
    let reply = client.next_line().await;
    assert!(reply.starts_with("Available rooms are:") || reply == "There are no rooms yet.");
}

#[tokio::test]
async fn unknown_command_reply_follows_earlier_replies() {
    let addr = start_server(local_config()).await;
    let mut client = TestClient::connect(addr).await;

    // Both lines in one write.
    client.send("/help\r\n/foo").await;

    client.expect("Help:").await;
    for _ in 0..6 {
        let usage = client.next_line().await;
        assert!(usage.starts_with('/'), "got {usage:?}");
    }
    client.expect("ERR: Unknown command: /foo").await;
}

#[tokio::test]
async fn join_without_room_warns() {
    let addr = start_server(local_config()).await;
    let mut client = TestClient::connect(addr).await;

    client.send("/join").await;
    let reply = client.next_line().await;
    assert!(reply.starts_with("WARN: "), "got {reply:?}");

    client.send("still alone").await;
    client.expect("ERR: You must join a room first!").await;
}

#[tokio::test]
async fn rooms_lists_created_rooms() {
    let addr = start_server(local_config()).await;
    let _a = TestClient::join_as(addr, "a", "lobby").await;
    let _b = TestClient::join_as(addr, "b", "dev").await;

    let mut c = TestClient::connect(addr).await;
    c.send("/rooms").await;
    let reply = c.next_line().await;
    assert!(reply.contains("lobby"), "got {reply:?}");
    assert!(reply.contains("dev"), "got {reply:?}");
}

#[tokio::test]
async fn quit_says_goodbye_and_notifies_room() {
    let addr = start_server(local_config()).await;
    let mut alice = TestClient::join_as(addr, "alice", "lobby").await;
    let mut bob = TestClient::join_as(addr, "bob", "lobby").await;
    alice.expect("bob has joined the room.").await;

    bob.send("/quit").await;
    bob.expect("See you later :)").await;
    bob.expect_closed().await;

    alice.expect("bob has left the room.").await;
    alice.expect_nothing().await;
}

#[tokio::test]
async fn dropped_connection_counts_as_leaving() {
    let addr = start_server(local_config()).await;
    let mut alice = TestClient::join_as(addr, "alice", "lobby").await;
    let bob = TestClient::join_as(addr, "bob", "lobby").await;
    alice.expect("bob has joined the room.").await;

    drop(bob);

    alice.expect("bob has left the room.").await;
}

#[tokio::test]
async fn prompt_is_redrawn_after_each_line() {
    let config = Config {
        prompt: Some("> ".to_string()),
        ..local_config()
    };
    let addr = start_server(config).await;
    let mut client = TestClient::connect_raw(addr).await;

    // Initial prompt, then "\r<greeting>\n".
    let first = client.next_line().await;
    assert!(first.starts_with("> \rWelcome!"), "got {first:?}");

    client.send("/foo").await;
    // Previous prompt, then the error.
    client.expect("> \rERR: Unknown command: /foo").await;
}

#[tokio::test]
async fn full_server_rejects_extra_clients() {
    let config = Config {
        max_clients: 1,
        ..local_config()
    };
    let addr = start_server(config).await;

    let _first = TestClient::connect(addr).await;

    let mut second = TestClient::connect_raw(addr).await;
    second.expect("ERR: Server is full").await;
    second.expect_closed().await;
}
