//! Reply text constructors.
//!
//! Every reply and every delivered message is one line of text; the codec
//! appends the terminator.

/// Successful `/NICK`.
pub fn nickname_set(nick: &str) -> String {
    format!("Nickname set to {nick}")
}

/// `/NICK` for a name held by another connection.
pub const NICKNAME_IN_USE: &str = "Nickname already in use";

/// Successful `/MSG`.
pub const MESSAGE_SENT: &str = "Message sent";

/// `/LIST` reply: `Users: a, b, c`.
pub fn users<S: AsRef<str>>(nicks: &[S]) -> String {
    let joined = nicks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Users: {joined}")
}

/// Line delivered to each recipient of a message.
pub fn delivery(sender: &str, body: &str) -> String {
    format!("[{sender}]: {body}")
}
