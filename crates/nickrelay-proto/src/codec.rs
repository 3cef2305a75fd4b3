//! Line-based codec for tokio.
//!
//! Reads `\n`-terminated lines (a trailing `\r` is stripped) and writes text
//! followed by `\n`. Framing problems are reported in-band as
//! `Err(LineError)` items so a bad line never terminates the stream; only
//! I/O errors do.

use std::cmp;
use std::io;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::LineError;

/// Default maximum line length in bytes, excluding the terminator.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Line codec with a bounded line length.
///
/// Lines longer than the limit are discarded up to the next newline and
/// surface once as [`LineError::TooLong`].
#[derive(Debug, Clone)]
pub struct ChatCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Currently skipping the remainder of an over-long line
    discarding: bool,
}

impl ChatCodec {
    /// Create a codec with [`DEFAULT_MAX_LINE_LENGTH`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Turn a line without its `\n` into text, enforcing the length limit.
    fn to_text(&self, line: &[u8]) -> Result<String, LineError> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.len() > self.max_len {
            return Err(LineError::TooLong {
                limit: self.max_len,
            });
        }
        std::str::from_utf8(line)
            .map(str::to_owned)
            .map_err(|_| LineError::InvalidUtf8)
    }
}

impl Default for ChatCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ChatCodec {
    type Item = Result<String, LineError>;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        loop {
            // A full-length line plus "\r\n" fits in max_len + 2 bytes
            let read_to = cmp::min(self.max_len.saturating_add(2), src.len());
            let newline = src[self.next_index..read_to]
                .iter()
                .position(|b| *b == b'\n');

            match (self.discarding, newline) {
                (true, Some(offset)) => {
                    src.advance(self.next_index + offset + 1);
                    self.next_index = 0;
                    self.discarding = false;
                    return Ok(Some(Err(LineError::TooLong {
                        limit: self.max_len,
                    })));
                }
                (true, None) => {
                    src.advance(read_to);
                    self.next_index = 0;
                    if src.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(offset)) => {
                    let end = self.next_index + offset;
                    self.next_index = 0;
                    let line = src.split_to(end + 1);
                    return Ok(Some(self.to_text(&line[..end])));
                }
                (false, None) if src.len() > self.max_len.saturating_add(1) => {
                    self.discarding = true;
                }
                (false, None) => {
                    // No complete line yet - remember where we stopped
                    self.next_index = read_to;
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }

        self.next_index = 0;
        if self.discarding {
            src.clear();
            self.discarding = false;
            return Ok(Some(Err(LineError::TooLong {
                limit: self.max_len,
            })));
        }
        if src.is_empty() {
            return Ok(None);
        }

        // Unterminated final line
        let line = src.split_to(src.len());
        Ok(Some(self.to_text(&line)))
    }
}

impl<T: AsRef<str>> Encoder<T> for ChatCodec {
    type Error = io::Error;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> io::Result<()> {
        let line = line.as_ref();
        dst.reserve(line.len() + 1);
        dst.put(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
