use crate::error::RegistryError;
use nickrelay_proto::Recipients;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Connection identity: the peer address string of the client's socket.
///
/// Only meaningful while the connection is alive; used to recognise a
/// connection re-registering under a new nickname.
pub type ConnId = String;

/// Output handle for one client.
///
/// Lines queued here are written to the socket, in order, by the
/// connection's writer task.
pub type Outbox = mpsc::Sender<Arc<str>>;

/// Outcome of a successful nickname claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickChange {
    /// Nickname the connection held before, if any.
    pub previous: Option<String>,
    /// Nickname now held.
    pub nick: String,
}

/// Outcome of a message fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Recipients whose outbox accepted the line.
    pub delivered: usize,
    /// Recipients whose outbox was full or closed.
    pub dropped: usize,
    /// Named recipients with no registration.
    pub unknown: Vec<String>,
}

/// Events that can be sent to the Registry Actor.
#[derive(Debug)]
pub enum RegistryEvent {
    /// Claim or change a connection's nickname.
    SetNickname {
        conn_id: ConnId,
        nick: String,
        outbox: Outbox,
        reply_tx: oneshot::Sender<Result<NickChange, RegistryError>>,
    },
    /// Snapshot of registered nicknames, sorted.
    ListUsers {
        reply_tx: oneshot::Sender<Vec<String>>,
    },
    /// Deliver a message to other registered clients.
    SendMessage {
        sender: String,
        recipients: Recipients,
        body: String,
        reply_tx: oneshot::Sender<Delivery>,
    },
    /// Drop a connection's registration. Reply carries the released nickname.
    Deregister {
        conn_id: ConnId,
        reply_tx: oneshot::Sender<Option<String>>,
    },
}

impl RegistryEvent {
    /// Static name for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetNickname { .. } => "set_nickname",
            Self::ListUsers { .. } => "list_users",
            Self::SendMessage { .. } => "send_message",
            Self::Deregister { .. } => "deregister",
        }
    }
}
