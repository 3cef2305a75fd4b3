//! Queue and framing limits configuration.

use serde::Deserialize;

/// Queue and framing limits.
///
/// These bound the memory a single slow client or a burst of commands can
/// pin on the relay.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Per-connection outbound queue depth (default: 256).
    /// Deliveries to a client whose queue is full are dropped for that client.
    #[serde(default = "default_sendq")]
    pub sendq: usize,
    /// Registry actor mailbox capacity (default: 1024).
    /// Connections wait for space when it is full.
    #[serde(default = "default_command_queue")]
    pub command_queue: usize,
    /// Maximum inbound line length in bytes, excluding the terminator (default: 4096).
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            sendq: default_sendq(),
            command_queue: default_command_queue(),
            max_line_length: default_max_line_length(),
        }
    }
}

fn default_sendq() -> usize {
    256
}

fn default_command_queue() -> usize {
    1024
}

fn default_max_line_length() -> usize {
    nickrelay_proto::codec::DEFAULT_MAX_LINE_LENGTH
}
