//! TCP chat server binary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_server::config::Config;
use chat_server::server;

#[derive(Parser)]
#[command(name = "chat-server")]
#[command(about = "Multi-room line chat server")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides config and CHAT_BIND_ADDR)
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Maximum simultaneous clients
    #[arg(long)]
    max_clients: Option<usize>,

    /// Prompt redrawn after every line sent to a client
    #[arg(long)]
    prompt: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::from_env()?,
        };

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max_clients) = self.max_clients {
            config.max_clients = max_clients;
        }
        if let Some(prompt) = self.prompt {
            config.prompt = Some(prompt);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_target(false)
        .init();

    let config = cli.into_config()?;

    info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        queue_capacity = config.queue_capacity,
        "starting chat-server"
    );

    server::run(config).await
}
