//! Unified error handling for nickrelay.
//!
//! This module provides the error hierarchy for the relay, with reply text
//! generation for client-visible failures and metric labeling.

use nickrelay_proto::{LineError, ProtocolError, reply};
use thiserror::Error;

// ============================================================================
// Registry Errors (actor operations)
// ============================================================================

/// Registry operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The nickname is held by a different connection.
    #[error("nickname in use: {0}")]
    NameTaken(String),

    /// The registry actor has stopped; no command can be served.
    #[error("registry unavailable")]
    Unavailable,
}

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur while handling one client line.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Line(#[from] LineError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Protocol(e) => e.error_code(),
            Self::Line(LineError::TooLong { .. }) => "line_too_long",
            Self::Line(LineError::InvalidUtf8) => "invalid_utf8",
            Self::Registry(RegistryError::NameTaken(_)) => "nickname_in_use",
            Self::Registry(RegistryError::Unavailable) => "registry_unavailable",
        }
    }

    /// Text sent back to the offending client.
    ///
    /// Returns `None` for errors that end the connection instead of
    /// producing a reply.
    pub fn reply_text(&self) -> Option<String> {
        match self {
            Self::Protocol(e) => Some(e.to_string()),
            Self::Line(e) => Some(e.to_string()),
            Self::Registry(RegistryError::NameTaken(_)) => Some(reply::NICKNAME_IN_USE.to_string()),
            Self::Registry(RegistryError::Unavailable) => None,
        }
    }
}

/// Result type for command handlers: the reply line on success.
pub type HandlerResult = Result<String, HandlerError>;
