//! Prometheus scrape endpoint.
//!
//! The listener is bound during startup so a port clash fails the process
//! immediately; serving then runs on its own task.

use axum::{Router, http::header, response::IntoResponse, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// GET /metrics - current metrics in the Prometheus text format.
async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        crate::metrics::gather_metrics(),
    )
}

/// HTTP listener serving `/metrics`.
pub struct MetricsServer {
    listener: TcpListener,
}

impl MetricsServer {
    /// Bind `0.0.0.0:port`.
    pub async fn bind(port: u16) -> std::io::Result<Self> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "Prometheus HTTP server listening");
        Ok(Self { listener })
    }

    /// Serve scrapes until the process exits.
    pub async fn run(self) {
        let app = Router::new().route("/metrics", get(metrics_handler));
        if let Err(e) = axum::serve(self.listener, app).await {
            tracing::error!(error = %e, "HTTP server error");
        }
    }
}
