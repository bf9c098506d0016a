//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections, up to `max_clients` at a time.
//! - Assigns each connection a `ClientId`.
//! - Spawns:
//!   - a per-client task to handle I/O,
//!   - a single dispatcher task that owns every session and room.
//!
//! The actual per-client logic and dispatcher loop live in `client`
//! and `dispatcher_task` modules respectively.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use chat_core::{ClientId, ServerLine};
use chat_protocol::render_line;

use crate::client;
use crate::config::Config;
use crate::dispatcher_task;
use crate::types::{RequestRx, RequestTx};

/// Global-ish counter for assigning unique `ClientId`s.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    tokio::select! {
        result = serve(listener, config) => result,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            info!("shutdown signal received, stopping");
            Ok(())
        }
    }
}

/// Accept connections on an already bound listener.
///
/// Runs until the task is dropped; failed accepts and per-connection
/// errors are logged and never stop the loop.
pub async fn serve(listener: TcpListener, config: Config) -> anyhow::Result<()> {
    let config = Arc::new(config);

    // Channel from clients → dispatcher task.
    let (request_tx, request_rx): (RequestTx, RequestRx) = mpsc::channel(config.queue_capacity);

    // Spawn the central dispatcher task.
    tokio::spawn(dispatcher_task::run_dispatcher_loop(request_rx));

    let slots = Arc::new(Semaphore::new(config.max_clients));

    loop {
        let (stream, peer_addr) = accept_next(&listener).await;

        let permit = match Arc::clone(&slots).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(
                    %peer_addr,
                    max_clients = config.max_clients,
                    "rejecting connection: server full"
                );
                tokio::spawn(reject(stream));
                continue;
            }
        };

        let client_id = next_client_id();
        info!(client = %client_id, %peer_addr, "accepted connection");

        let request_tx = request_tx.clone();
        let config = Arc::clone(&config);

        tokio::spawn(async move {
            // Held until the connection is fully torn down.
            let _permit = permit;

            match client::run_client(client_id, stream, request_tx, config).await {
                Ok(()) => info!(client = %client_id, "connection closed"),
                Err(err) => warn!(client = %client_id, error = %err, "connection ended with error"),
            }
        });
    }
}

/// Pause after a failed accept (e.g. out of file descriptors) so a
/// persistent error does not spin the loop.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Accept the next connection, retrying failed accepts after a delay.
pub(crate) async fn accept_next(listener: &TcpListener) -> (TcpStream, SocketAddr) {
    loop {
        match listener.accept().await {
            Ok(accepted) => return accepted,
            Err(err) => {
                warn!(error = %err, "unable to accept connection, retrying");
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

async fn reject(mut stream: TcpStream) {
    if let Some(text) = render_line(&ServerLine::error("Server is full"), None) {
        let _ = stream.write_all(text.as_bytes()).await;
    }
    let _ = stream.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accept_next_returns_pending_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let connect = tokio::spawn(TcpStream::connect(addr));
        let (_stream, peer_addr) = accept_next(&listener).await;
        let client = connect.await.unwrap().unwrap();

        assert_eq!(peer_addr, client.local_addr().unwrap());
    }
}
