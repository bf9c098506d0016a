// crates/chat-server/src/client.rs

use std::sync::Arc;

use anyhow::Context;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, warn};

use chat_core::{ClientId, Command, CommandKind, OutboundRx, OutboundTx, Request, ServerLine};
use chat_protocol::{parse_line, render_line, ParsedLine};

use crate::config::Config;
use crate::nickname::generate_nickname;
use crate::types::RequestTx;

/// Run the I/O loop for a single connection.
///
/// Registers a session with the dispatcher, then reads lines until EOF,
/// an I/O error or `/quit`. Every command, and every error about an
/// unknown command, goes through the dispatcher queue so replies keep
/// the order of the lines that caused them.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    request_tx: RequestTx,
    config: Arc<Config>,
) -> anyhow::Result<()> {
    let (read_half, write_half) = stream.into_split();
    let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

    // Writer task: consume ServerLines and write them out.
    let writer = tokio::spawn(run_writer(
        client_id,
        write_half,
        out_rx,
        config.prompt.clone(),
    ));

    let connect = Request::Connect {
        client: client_id,
        nickname: generate_nickname(config.nickname_length),
        sink: out_tx.clone(),
    };
    let result = match request_tx.send(connect).await {
        Ok(()) => {
            let outcome =
                run_reader(client_id, read_half, &request_tx, &out_tx, config.max_line_length)
                    .await;
            if outcome != ReadOutcome::Quit {
                // Implicit quit. A no-op if the dispatcher already dropped us.
                let _ = request_tx
                    .send(Request::Disconnect { client: client_id })
                    .await;
            }
            match outcome {
                ReadOutcome::DispatcherGone => Err(anyhow::anyhow!("dispatcher channel closed")),
                _ => Ok(()),
            }
        }
        Err(_) => Err(anyhow::anyhow!("dispatcher channel closed")),
    };

    // The writer stops once every sender is gone (or after Close), which
    // lets queued lines such as the farewell reach the socket first.
    drop(out_tx);
    writer.await.context("writer task panicked")?;

    result
}

#[derive(Debug, PartialEq, Eq)]
enum ReadOutcome {
    Eof,
    Quit,
    Failed,
    DispatcherGone,
}

async fn run_reader(
    client_id: ClientId,
    read_half: OwnedReadHalf,
    request_tx: &RequestTx,
    out_tx: &OutboundTx,
    max_line_length: usize,
) -> ReadOutcome {
    let mut lines = FramedRead::new(read_half, LinesCodec::new_with_max_length(max_line_length));

    while let Some(frame) = lines.next().await {
        let line = match frame {
            Ok(line) => line,
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                warn!(client = %client_id, max_line_length, "line too long, closing");
                let _ = out_tx.send(ServerLine::error("Line too long"));
                return ReadOutcome::Failed;
            }
            Err(LinesCodecError::Io(err)) => {
                warn!(client = %client_id, error = %err, "read error");
                return ReadOutcome::Failed;
            }
        };

        debug!(client = %client_id, line = %line, "received");

        match parse_line(&line) {
            ParsedLine::Empty => continue,
            ParsedLine::Unknown(token) => {
                let reply = Request::Reply {
                    client: client_id,
                    line: ServerLine::error(format!("Unknown command: {token}")),
                };
                if request_tx.send(reply).await.is_err() {
                    return ReadOutcome::DispatcherGone;
                }
            }
            ParsedLine::Command { kind, args } => {
                let command = Command::new(kind, client_id, args);
                if request_tx.send(Request::Command(command)).await.is_err() {
                    return ReadOutcome::DispatcherGone;
                }
                if kind == CommandKind::Quit {
                    return ReadOutcome::Quit;
                }
            }
        }
    }

    debug!(client = %client_id, "eof");
    ReadOutcome::Eof
}

async fn run_writer(
    client_id: ClientId,
    mut write_half: OwnedWriteHalf,
    mut out_rx: OutboundRx,
    prompt: Option<String>,
) {
    if let Some(prompt) = prompt.as_deref() {
        if let Err(err) = write_half.write_all(prompt.as_bytes()).await {
            warn!(client = %client_id, error = %err, "write error");
            return;
        }
    }

    while let Some(line) = out_rx.recv().await {
        let Some(text) = render_line(&line, prompt.as_deref()) else {
            // Close: stop after everything queued before it.
            break;
        };

        if let Err(err) = write_half.write_all(text.as_bytes()).await {
            warn!(client = %client_id, error = %err, "write error");
            break;
        }
    }

    let _ = write_half.flush().await;
    let _ = write_half.shutdown().await;
}
