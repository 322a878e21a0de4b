//! linelink - a line-based chat console client.
//!
//! Reads lines from standard input and routes each one: lines starting with
//! the `#` marker are interpreted as commands, everything else is forwarded
//! to the server as a chat message.

mod client;
mod config;
mod console;
mod display;
mod error;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::client::{ChatClient, TcpClient};
use crate::config::Config;
use crate::console::Console;
use crate::display::{DisplaySink, StdoutDisplay};

/// Optional config file looked up in the working directory.
const CONFIG_PATH: &str = "linelink.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing. Diagnostics go to stderr; stdout carries chat.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(identity) = args.next() else {
        eprintln!("You need a login ID");
        eprintln!("usage: linelink <loginid> [host] [port]");
        std::process::exit(2);
    };

    let config = Config::load_or_default(CONFIG_PATH).map_err(|e| {
        error!(path = CONFIG_PATH, error = %e, "Failed to load config");
        e
    })?;

    let host = match args.next() {
        Some(host) => host,
        None => config.connection.host,
    };
    let port = match args.next() {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("invalid port argument: {raw}"))?,
        None => config.connection.port,
    };

    info!(identity = %identity, host = %host, port = port, "Starting linelink");

    let display: Arc<dyn DisplaySink> = Arc::new(StdoutDisplay);
    let client: Arc<dyn ChatClient> = Arc::new(TcpClient::new(host, port, Arc::clone(&display)));

    // The initial connection is mandatory; without it there is no session.
    if let Err(e) = client.open_connection().await {
        error!(error = %e, "Initial connection failed");
        display.show("Error: Can't setup connection! Terminating Client.");
        std::process::exit(1);
    }

    let console = Console::new(identity, client, display);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    console.run(stdin).await;

    Ok(())
}
