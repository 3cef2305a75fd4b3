//! Error handling utilities for connection management.
//!
//! Classifies read results into the action the connection loop takes.

use crate::error::HandlerError;
use nickrelay_proto::LineError;

/// Classification of a decoded frame for appropriate handling.
pub(super) enum ReadAction {
    /// A text line to dispatch
    Line(String),
    /// Recoverable framing error - reply inline and continue
    Reject(HandlerError),
    /// I/O error - connection is broken, just log and disconnect
    IoError(std::io::Error),
    /// Peer closed the connection
    Closed,
}

/// Classify the next item from the framed reader.
pub(super) fn classify_read(
    item: Option<Result<Result<String, LineError>, std::io::Error>>,
) -> ReadAction {
    match item {
        Some(Ok(Ok(line))) => ReadAction::Line(line),
        Some(Ok(Err(line_err))) => ReadAction::Reject(line_err.into()),
        Some(Err(e)) => ReadAction::IoError(e),
        None => ReadAction::Closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_read() {
        assert!(matches!(
            classify_read(Some(Ok(Ok("/L".into())))),
            ReadAction::Line(line) if line == "/L"
        ));
        assert!(matches!(
            classify_read(Some(Ok(Err(LineError::TooLong { limit: 4 })))),
            ReadAction::Reject(HandlerError::Line(_))
        ));
        assert!(matches!(
            classify_read(Some(Err(std::io::ErrorKind::ConnectionReset.into()))),
            ReadAction::IoError(_)
        ));
        assert!(matches!(classify_read(None), ReadAction::Closed));
    }
}
