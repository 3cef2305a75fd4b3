//! # nickrelay-proto
//!
//! The line protocol spoken between nickrelay clients and the relay.
//!
//! ## Features
//!
//! - Newline-delimited framing with a bounded line length ([`ChatCodec`])
//! - Parsing of the three client verbs into typed commands ([`ClientCommand`])
//! - Canonical reply and delivery text ([`reply`])
//!
//! ## Quick Start
//!
//! ```rust
//! use nickrelay_proto::{ClientCommand, Recipients};
//!
//! let cmd = ClientCommand::parse("/MSG bob,carol hello there").unwrap();
//! assert_eq!(
//!     cmd,
//!     ClientCommand::Msg {
//!         recipients: Recipients::Named(vec!["bob".into(), "carol".into()]),
//!         body: "hello there".into(),
//!     }
//! );
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod codec;
pub mod command;
pub mod error;
pub mod reply;

pub use self::codec::ChatCodec;
pub use self::command::{ClientCommand, Recipients, Verb};
pub use self::error::{LineError, ProtocolError};
