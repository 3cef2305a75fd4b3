//! Test server management.
//!
//! Spawns and manages nickrelay instances for integration testing.

use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A running nickrelay process, killed on drop.
pub struct TestServer {
    child: Child,
    port: u16,
    _config_dir: TempDir,
}

impl TestServer {
    /// Spawn a server on `port` with default limits.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        Self::spawn_with_limits(port, "").await
    }

    /// Spawn a server with extra `[limits]` entries, one `key = value` per line.
    pub async fn spawn_with_limits(port: u16, limits: &str) -> anyhow::Result<Self> {
        let config_dir = tempfile::tempdir()?;
        let config_path = config_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.relay"
metrics_port = 0

[listen]
address = "127.0.0.1:{port}"

[limits]
{limits}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_nickrelay"))
            .arg(&config_path)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .spawn()?;

        let server = Self {
            child,
            port,
            _config_dir: config_dir,
        };

        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
