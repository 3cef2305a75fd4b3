//! Error types for the relay line protocol.
//!
//! [`LineError`] covers framing problems detected by the codec, and
//! [`ProtocolError`] covers lines that frame correctly but do not form a
//! valid command. Both are recoverable: the connection stays open and the
//! client receives the error's display text as an inline reply.

use thiserror::Error;

/// A framed line that could not be turned into text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// The line exceeded the codec's maximum length and was discarded.
    #[error("Line too long")]
    TooLong {
        /// Maximum allowed length in bytes, excluding the terminator.
        limit: usize,
    },

    /// The line was not valid UTF-8.
    #[error("Invalid command")]
    InvalidUtf8,
}

/// A line that does not form a valid client command.
///
/// The `Display` text of each variant is exactly the reply sent back to the
/// offending client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Empty or whitespace-only line.
    #[error("Invalid command")]
    Empty,

    /// First token is not a known verb.
    #[error("Unknown command")]
    UnknownCommand(String),

    /// `/NICK` without a nickname.
    #[error("Usage: /NICK <nickname>")]
    MissingNickname,

    /// `/MSG` without both recipients and a message.
    #[error("Usage: /MSG <recipient(s)> <message>")]
    MissingMessageArgs,

    /// `/MSG` was issued before any nickname was claimed.
    #[error("Set a nickname first using /NICK")]
    NicknameRequired,
}

impl ProtocolError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::UnknownCommand(_) => "unknown_command",
            Self::MissingNickname | Self::MissingMessageArgs => "need_more_params",
            Self::NicknameRequired => "nickname_required",
        }
    }
}
