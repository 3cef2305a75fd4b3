//! Actor Model for Registry State Management.
//!
//! This module implements the `RegistryActor`, which owns the nickname
//! registry in an isolated Tokio task. No lock guards the registry: every
//! read and write is a `RegistryEvent` processed by this one task.
//!
//! # Architecture
//!
//! - **State Ownership**: The `RegistryActor` owns the nickname map and the
//!   outbox of every registered client.
//! - **Message Passing**: Connections submit `RegistryEvent`s carrying a
//!   `oneshot` reply slot and await the answer.
//! - **Total Order**: Events are handled one at a time, each to completion
//!   (map update, fan-out and reply) before the next is received.

use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;
use tracing::debug;

mod handlers;
mod types;

pub use types::*;

/// One registered client.
#[derive(Debug)]
pub struct Registration {
    pub(crate) conn_id: ConnId,
    pub(crate) outbox: Outbox,
}

/// The Registry Actor.
///
/// `nicks` and `owners` are kept as exact inverses of each other.
pub struct RegistryActor {
    /// Nickname to registration; ordered so listings come out sorted.
    pub(crate) nicks: BTreeMap<String, Registration>,
    /// Connection to the nickname it currently holds.
    pub(crate) owners: HashMap<ConnId, String>,
}

impl RegistryActor {
    pub(crate) fn new() -> Self {
        Self {
            nicks: BTreeMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Create a new Registry Actor and spawn it.
    pub fn spawn(capacity: usize) -> mpsc::Sender<RegistryEvent> {
        let (tx, rx) = mpsc::channel(capacity);

        let actor = Self::new();
        tokio::spawn(async move {
            actor.run(rx).await;
        });

        tx
    }

    /// The main actor loop.
    pub async fn run(mut self, mut rx: mpsc::Receiver<RegistryEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        debug!(registered = self.nicks.len(), "Registry actor stopped");
    }

    fn handle_event(&mut self, event: RegistryEvent) {
        let _timer = crate::telemetry::CommandTimer::new(event.name());

        match event {
            RegistryEvent::SetNickname {
                conn_id,
                nick,
                outbox,
                reply_tx,
            } => {
                let result = self.handle_set_nickname(conn_id, nick, outbox);
                let _ = reply_tx.send(result);
            }
            RegistryEvent::ListUsers { reply_tx } => {
                let _ = reply_tx.send(self.nicks.keys().cloned().collect());
            }
            RegistryEvent::SendMessage {
                sender,
                recipients,
                body,
                reply_tx,
            } => {
                let delivery = self.handle_send_message(&sender, &recipients, &body);
                let _ = reply_tx.send(delivery);
            }
            RegistryEvent::Deregister { conn_id, reply_tx } => {
                let _ = reply_tx.send(self.handle_deregister(&conn_id));
            }
        }

        debug_assert_eq!(self.nicks.len(), self.owners.len());
        crate::metrics::set_registered_nicks(self.nicks.len());
    }
}
