//! Prometheus metrics collection for nickrelay.
//!
//! Metrics are exposed on an optional HTTP endpoint (see [`crate::http`]).
//! Recording helpers are no-ops until [`init`] has run, so tests and
//! metrics-disabled deployments pay nothing.
//!
//! - `relay_connected_clients` - Open client connections (gauge)
//! - `relay_registered_nicks` - Nicknames currently registered (gauge)
//! - `relay_command_total{command}` - Registry events processed by type
//! - `relay_command_duration_seconds{command}` - Registry event latency
//! - `relay_command_errors_total{command,error}` - Client-visible command failures
//! - `relay_message_fanout` - Recipients per delivered message (histogram)
//! - `relay_messages_dropped_total` - Deliveries dropped on a full SendQ

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Currently open client connections.
pub static CONNECTED_CLIENTS: OnceLock<IntGauge> = OnceLock::new();

/// Nicknames currently registered.
pub static REGISTERED_NICKS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Counters and histograms
// ========================================================================

/// Registry events processed by type.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Registry event processing latency by type.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Client command errors by verb and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Recipients per message.
pub static MESSAGE_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Deliveries dropped because the recipient's SendQ was full.
pub static MESSAGES_DROPPED: OnceLock<IntCounter> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(CONNECTED_CLIENTS, IntGauge::new("relay_connected_clients", "Open client connections"));
    register!(REGISTERED_NICKS, IntGauge::new("relay_registered_nicks", "Registered nicknames"));
    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("relay_command_total", "Registry events processed by type"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("relay_command_duration_seconds", "Registry event latency by type")
            .buckets(vec![0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("relay_command_errors_total", "Client command errors by type"), &["command", "error"]));
    register!(MESSAGE_FANOUT, Histogram::with_opts(
        HistogramOpts::new("relay_message_fanout", "Recipients per message")
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0])));
    register!(MESSAGES_DROPPED, IntCounter::new("relay_messages_dropped_total", "Deliveries dropped due to a full SendQ"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Record a registry event with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a client command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

/// Record message fan-out (how many recipients received a message).
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = MESSAGE_FANOUT.get() {
        h.observe(recipients as f64);
    }
}

#[inline]
pub fn record_dropped_delivery() {
    if let Some(c) = MESSAGES_DROPPED.get() {
        c.inc();
    }
}

#[inline]
pub fn set_registered_nicks(count: usize) {
    if let Some(g) = REGISTERED_NICKS.get() {
        g.set(count as i64);
    }
}

#[inline]
pub fn client_connected() {
    if let Some(g) = CONNECTED_CLIENTS.get() {
        g.inc();
    }
}

#[inline]
pub fn client_disconnected() {
    if let Some(g) = CONNECTED_CLIENTS.get() {
        g.dec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        // Safe to call more than once; later registrations only warn
        init();

        record_command("list_users", 0.0001);
        record_command_error("NICK", "nickname_in_use");
        record_fanout(3);
        set_registered_nicks(2);

        let output = gather_metrics();
        assert!(output.contains("relay_command_total"));
        assert!(output.contains("relay_command_errors_total"));
        assert!(output.contains("relay_message_fanout"));
    }
}
