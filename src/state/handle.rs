//! Request/response front-end for the Registry actor.

use super::actor::{ConnId, Delivery, NickChange, Outbox, RegistryActor, RegistryEvent};
use crate::error::RegistryError;
use nickrelay_proto::Recipients;
use tokio::sync::{mpsc, oneshot};

/// Cloneable handle to the Registry actor.
///
/// Each call submits one event with a fresh `oneshot` reply slot and waits
/// for the actor's answer.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    tx: mpsc::Sender<RegistryEvent>,
}

impl RegistryHandle {
    /// Spawn a Registry actor with the given mailbox capacity.
    pub fn spawn(capacity: usize) -> Self {
        Self {
            tx: RegistryActor::spawn(capacity),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_sender(tx: mpsc::Sender<RegistryEvent>) -> Self {
        Self { tx }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RegistryEvent,
    ) -> Result<T, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| RegistryError::Unavailable)?;
        reply_rx.await.map_err(|_| RegistryError::Unavailable)
    }

    /// Claim `nick` for `conn_id`, replacing any nickname the connection held.
    pub async fn set_nickname(
        &self,
        conn_id: &ConnId,
        nick: &str,
        outbox: Outbox,
    ) -> Result<NickChange, RegistryError> {
        self.request(|reply_tx| RegistryEvent::SetNickname {
            conn_id: conn_id.clone(),
            nick: nick.to_string(),
            outbox,
            reply_tx,
        })
        .await?
    }

    /// Registered nicknames, sorted.
    pub async fn list_users(&self) -> Result<Vec<String>, RegistryError> {
        self.request(|reply_tx| RegistryEvent::ListUsers { reply_tx })
            .await
    }

    /// Fan a message out to `recipients`.
    pub async fn send_message(
        &self,
        sender: &str,
        recipients: Recipients,
        body: &str,
    ) -> Result<Delivery, RegistryError> {
        self.request(|reply_tx| RegistryEvent::SendMessage {
            sender: sender.to_string(),
            recipients,
            body: body.to_string(),
            reply_tx,
        })
        .await
    }

    /// Remove the connection's registration, returning the released nickname.
    pub async fn deregister(&self, conn_id: &ConnId) -> Result<Option<String>, RegistryError> {
        self.request(|reply_tx| RegistryEvent::Deregister {
            conn_id: conn_id.clone(),
            reply_tx,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn outbox() -> (Outbox, mpsc::Receiver<Arc<str>>) {
        mpsc::channel(8)
    }

    #[tokio::test]
    async fn test_uniqueness_under_concurrent_claims() {
        let registry = RegistryHandle::spawn(64);

        let mut tasks = Vec::new();
        for i in 0..16 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let (tx, _rx) = outbox();
                registry
                    .set_nickname(&format!("10.0.0.{i}:4000"), "alice", tx)
                    .await
            }));
        }

        let mut winners = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => winners += 1,
                Err(RegistryError::NameTaken(nick)) => assert_eq!(nick, "alice"),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(registry.list_users().await.unwrap(), vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_list_users_is_sorted_and_may_be_empty() {
        let registry = RegistryHandle::spawn(8);
        assert!(registry.list_users().await.unwrap().is_empty());

        for (conn, nick) in [("c:3", "carol"), ("a:1", "alice"), ("b:2", "Bob")] {
            let (tx, _rx) = outbox();
            registry.set_nickname(&conn.to_string(), nick, tx).await.unwrap();
        }

        assert_eq!(
            registry.list_users().await.unwrap(),
            vec!["Bob".to_string(), "alice".to_string(), "carol".to_string()]
        );
    }

    #[tokio::test]
    async fn test_send_message_reaches_other_clients() {
        let registry = RegistryHandle::spawn(8);
        let (alice_tx, mut alice_rx) = outbox();
        let (bob_tx, mut bob_rx) = outbox();
        registry.set_nickname(&"a:1".to_string(), "alice", alice_tx).await.unwrap();
        registry.set_nickname(&"b:2".to_string(), "bob", bob_tx).await.unwrap();

        let delivery = registry
            .send_message("alice", Recipients::Everyone, "hello")
            .await
            .unwrap();

        assert_eq!(delivery.delivered, 1);
        assert_eq!(&*bob_rx.recv().await.unwrap(), "[alice]: hello");
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_deregister_twice_is_harmless() {
        let registry = RegistryHandle::spawn(8);
        let conn = "a:1".to_string();
        let (tx, _rx) = outbox();
        registry.set_nickname(&conn, "alice", tx).await.unwrap();

        assert_eq!(registry.deregister(&conn).await.unwrap(), Some("alice".into()));
        assert_eq!(registry.deregister(&conn).await.unwrap(), None);
        assert!(registry.list_users().await.unwrap().is_empty());
    }
}
