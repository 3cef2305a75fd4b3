//! Test relay client.
//!
//! Sends raw command lines and reads reply lines with a timeout.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A line-oriented test client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send raw bytes followed by `\n`.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send one command line.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_bytes(line.as_bytes()).await
    }

    /// Receive a single line from the server.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a line with a timeout. Fails on timeout or end of stream.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("Connection closed by server");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Send a command and return the next line received.
    pub async fn request(&mut self, line: &str) -> anyhow::Result<String> {
        self.send(line).await?;
        self.recv().await
    }

    /// Claim a nickname, failing unless the server confirms it.
    pub async fn nick(&mut self, nick: &str) -> anyhow::Result<()> {
        let reply = self.request(&format!("/NICK {nick}")).await?;
        let expected = format!("Nickname set to {nick}");
        if reply != expected {
            anyhow::bail!("Expected {expected:?}, got {reply:?}");
        }
        Ok(())
    }

    /// Assert nothing arrives within `dur`.
    #[allow(dead_code)]
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(line) => anyhow::bail!("Unexpected line from server: {line:?}"),
            Err(_) => Ok(()),
        }
    }
}
