//! nickrelay-client - line-oriented terminal client.
//!
//! Connects to a relay, forwards each stdin line to the server and prints
//! every line the server sends back, followed by a fresh prompt.
//!
//! Usage: `nickrelay-client [address]` (default `127.0.0.1:6666`).

use anyhow::Context as _;
use futures_util::{SinkExt, StreamExt};
use nickrelay_proto::ChatCodec;
use std::io::Write;
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, FramedRead, LinesCodec};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDRESS: &str = "127.0.0.1:6666";
const PROMPT: &str = "> ";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so they never interleave with chat output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    let stream = TcpStream::connect(&address)
        .await
        .with_context(|| format!("failed to connect to {address}"))?;
    let mut server = Framed::new(stream, ChatCodec::new());
    let mut stdin = FramedRead::new(tokio::io::stdin(), LinesCodec::new());

    prompt()?;
    loop {
        tokio::select! {
            incoming = server.next() => match incoming {
                Some(Ok(Ok(line))) => {
                    println!("\r{line}");
                    prompt()?;
                }
                Some(Ok(Err(e))) => warn!(error = %e, "Skipping unreadable line from server"),
                Some(Err(e)) => {
                    warn!(error = %e, "Error reading from server");
                    break;
                }
                None => {
                    println!("\rServer closed the connection.");
                    break;
                }
            },
            input = stdin.next() => match input {
                Some(Ok(line)) => {
                    server.send(line).await.context("failed to send to server")?;
                    prompt()?;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Error reading from stdin");
                    break;
                }
                None => break,
            },
        }
    }

    println!("Client exiting.");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(PROMPT.as_bytes())?;
    stdout.flush()
}
