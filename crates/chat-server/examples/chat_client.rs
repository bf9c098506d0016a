//! Minimal interactive client: stdin lines go to the server, server
//! lines are printed as they arrive.

use std::env;
use std::error::Error;

use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, LinesCodec};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("CHAT_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:8888".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected. Type /help for commands, /quit to leave.\n");

    let (read_half, mut write_half) = stream.into_split();

    // Print everything the server sends until it closes the connection.
    let printer = tokio::spawn(async move {
        let mut lines = FramedRead::new(read_half, LinesCodec::new());
        while let Some(Ok(line)) = lines.next().await {
            println!("<< {}", line);
        }
        println!("Server closed the connection.");
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = stdin.next_line().await? {
        if write_half.write_all(format!("{line}\n").as_bytes()).await.is_err() {
            break;
        }
        if line.trim() == "/quit" {
            break;
        }
    }

    printer.await?;
    Ok(())
}
