//! Client command parsing.
//!
//! A command line is a verb followed by whitespace-separated arguments:
//!
//! | Verb    | Abbrev | Arguments                 |
//! |---------|--------|---------------------------|
//! | `/NICK` | `/N`   | `<nickname>`              |
//! | `/LIST` | `/L`   | none                      |
//! | `/MSG`  | `/M`   | `<recipients> <message…>` |
//!
//! Verbs are case-sensitive. Extra arguments to `/NICK` and `/LIST` are
//! ignored.

use std::fmt;

use crate::error::ProtocolError;

/// Token addressing every registered client except the sender.
pub const EVERYONE: &str = "*";

/// The three verbs understood by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `/NICK` or `/N`.
    Nick,
    /// `/LIST` or `/L`.
    List,
    /// `/MSG` or `/M`.
    Msg,
}

impl Verb {
    /// Look up a verb from its full or abbreviated token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "/NICK" | "/N" => Some(Self::Nick),
            "/LIST" | "/L" => Some(Self::List),
            "/MSG" | "/M" => Some(Self::Msg),
            _ => None,
        }
    }

    /// Canonical (unabbreviated) name of the verb.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nick => "NICK",
            Self::List => "LIST",
            Self::Msg => "MSG",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who a message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// Every registered client except the sender.
    Everyone,
    /// An explicit set of nicknames, in first-mention order, without duplicates.
    Named(Vec<String>),
}

impl Recipients {
    /// Parse a recipient token: `*` or a comma-separated list of nicknames.
    ///
    /// Entries are whitespace-trimmed; empty entries and repeats are dropped.
    pub fn parse(token: &str) -> Self {
        if token == EVERYONE {
            return Self::Everyone;
        }

        let mut names: Vec<String> = Vec::new();
        for name in token.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Self::Named(names)
    }
}

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Claim or change the connection's nickname.
    Nick(String),
    /// List registered nicknames.
    List,
    /// Send a message.
    Msg {
        /// Addressees.
        recipients: Recipients,
        /// Message text, tokens joined by single spaces.
        body: String,
    },
}

impl ClientCommand {
    /// Parse one protocol line (without its terminator).
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return Err(ProtocolError::Empty);
        };
        let verb =
            Verb::from_token(head).ok_or_else(|| ProtocolError::UnknownCommand(head.to_string()))?;

        match verb {
            Verb::Nick => {
                let nick = tokens.next().ok_or(ProtocolError::MissingNickname)?;
                Ok(Self::Nick(nick.to_string()))
            }
            Verb::List => Ok(Self::List),
            Verb::Msg => {
                let target = tokens.next().ok_or(ProtocolError::MissingMessageArgs)?;
                let body = tokens.collect::<Vec<_>>().join(" ");
                if body.is_empty() {
                    return Err(ProtocolError::MissingMessageArgs);
                }
                Ok(Self::Msg {
                    recipients: Recipients::parse(target),
                    body,
                })
            }
        }
    }

    /// The verb this command was parsed from.
    pub fn verb(&self) -> Verb {
        match self {
            Self::Nick(_) => Verb::Nick,
            Self::List => Verb::List,
            Self::Msg { .. } => Verb::Msg,
        }
    }
}
