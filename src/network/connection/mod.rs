//! Connection - Handles an individual client connection.
//!
//! Each Connection runs two Tokio tasks:
//!
//! ```text
//!    ┌──────────────────────── Connection ────────────────────────┐
//!    │                                                            │
//!    │  FramedRead ──▶ dispatch ──▶ RegistryHandle ──▶ (actor)    │
//!    │                    │                               │       │
//!    │                    ▼ reply                         ▼ fan-out
//!    │                 Outbox (mpsc) ◀────────────────────┘       │
//!    │                    │                                       │
//!    │                    ▼                                       │
//!    │             writer task ──▶ FramedWrite                    │
//!    └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The outbox is the client's only path to its socket, so its own replies
//! and messages fanned out by the registry are written one at a time.

mod error_handling;

use error_handling::{ReadAction, classify_read};

use crate::config::LimitsConfig;
use crate::handlers::{Context, SessionState, dispatch, reply_for};
use crate::state::{ConnId, RegistryHandle};
use futures_util::{SinkExt, StreamExt};
use nickrelay_proto::ChatCodec;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{Instrument, debug, info, instrument, warn};

/// How long teardown waits for queued output to reach the peer.
const WRITER_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// A client connection handler.
pub struct Connection {
    conn_id: ConnId,
    stream: TcpStream,
    registry: RegistryHandle,
    sendq: usize,
    max_line_length: usize,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        registry: RegistryHandle,
        limits: &LimitsConfig,
    ) -> Self {
        Self {
            conn_id: addr.to_string(),
            stream,
            registry,
            sendq: limits.sendq,
            max_line_length: limits.max_line_length,
        }
    }

    /// Run the connection read loop until the client goes away.
    ///
    /// The connection's nickname is always released before returning.
    #[instrument(skip(self), fields(conn = %self.conn_id), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            conn_id,
            stream,
            registry,
            sendq,
            max_line_length,
        } = self;

        crate::metrics::client_connected();

        let (read_half, write_half) = stream.into_split();
        let mut reader = FramedRead::new(read_half, ChatCodec::with_max_len(max_line_length));
        let (outbox, outbox_rx) = mpsc::channel::<Arc<str>>(sendq);
        let writer = tokio::spawn(
            write_loop(FramedWrite::new(write_half, ChatCodec::new()), outbox_rx).in_current_span(),
        );

        let mut state = SessionState::Unnamed;
        let result = loop {
            let handled = match classify_read(reader.next().await) {
                ReadAction::Line(line) => {
                    let mut ctx = Context {
                        conn_id: &conn_id,
                        registry: &registry,
                        outbox: &outbox,
                        state: &mut state,
                    };
                    reply_for(dispatch(&mut ctx, &line).await)
                }
                ReadAction::Reject(e) => {
                    debug!(error = %e, "Rejected input line");
                    reply_for(Err(e))
                }
                ReadAction::IoError(e) => {
                    debug!(error = %e, "Read error");
                    break Ok(());
                }
                ReadAction::Closed => {
                    debug!("Client closed connection");
                    break Ok(());
                }
            };

            let reply = match handled {
                Ok(reply) => reply,
                Err(e) => break Err(anyhow::Error::from(e)),
            };
            if outbox.send(Arc::from(reply)).await.is_err() {
                debug!("Writer stopped, closing connection");
                break Ok(());
            }
        };

        // Deregistration is idempotent, so this runs on every exit path
        match registry.deregister(&conn_id).await {
            Ok(Some(nick)) => info!(%nick, "Nickname released on disconnect"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not deregister connection"),
        }

        // The writer exits once every outbox clone, including the registry's, is gone
        drop(outbox);
        finish_writer(writer, WRITER_DRAIN_GRACE).await;

        crate::metrics::client_disconnected();
        result
    }
}

/// Drain the outbox into the socket, flushing whenever the queue runs dry.
async fn write_loop(
    mut sink: FramedWrite<OwnedWriteHalf, ChatCodec>,
    mut rx: mpsc::Receiver<Arc<str>>,
) {
    while let Some(line) = rx.recv().await {
        if let Err(e) = write_batch(&mut sink, &mut rx, line).await {
            debug!(error = %e, "Write failed");
            return;
        }
    }
}

async fn write_batch(
    sink: &mut FramedWrite<OwnedWriteHalf, ChatCodec>,
    rx: &mut mpsc::Receiver<Arc<str>>,
    first: Arc<str>,
) -> std::io::Result<()> {
    sink.feed(first).await?;
    while let Ok(line) = rx.try_recv() {
        sink.feed(line).await?;
    }
    SinkExt::<Arc<str>>::flush(sink).await
}

/// Wait up to `grace` for the writer to drain, then abort it.
///
/// A peer that stops reading would otherwise pin the writer, and this
/// connection task, on a full socket forever.
async fn finish_writer(mut writer: JoinHandle<()>, grace: Duration) {
    match tokio::time::timeout(grace, &mut writer).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Writer task failed"),
        Err(_) => {
            debug!(?grace, "Writer did not drain in time, aborting");
            writer.abort();
        }
    }
}
