//! Client command handlers.
//!
//! Each connection feeds its decoded lines to [`dispatch`], which parses the
//! line, runs the matching handler against the registry, and returns the
//! reply line for the client. Malformed input is answered here and never
//! reaches the registry.

mod list;
mod messaging;
mod nick;

use crate::error::{HandlerError, HandlerResult};
use crate::state::{ConnId, Outbox, RegistryHandle};
use nickrelay_proto::{ClientCommand, ProtocolError, Verb};

/// Per-connection session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No nickname claimed yet.
    #[default]
    Unnamed,
    /// Holding a registered nickname.
    Named(String),
}

impl SessionState {
    pub fn nick(&self) -> Option<&str> {
        match self {
            Self::Unnamed => None,
            Self::Named(nick) => Some(nick),
        }
    }
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Identity of this connection inside the registry.
    pub conn_id: &'a ConnId,
    /// Handle to the registry actor.
    pub registry: &'a RegistryHandle,
    /// This client's outbox, registered alongside its nickname.
    pub outbox: &'a Outbox,
    /// Session state.
    pub state: &'a mut SessionState,
}

/// Parse and execute one client line, returning the reply text.
pub async fn dispatch(ctx: &mut Context<'_>, line: &str) -> HandlerResult {
    let command = match ClientCommand::parse(line) {
        Ok(command) => command,
        // The nickname requirement outranks the /MSG usage hint
        Err(ProtocolError::MissingMessageArgs) if ctx.state.nick().is_none() => {
            let e = ProtocolError::NicknameRequired;
            crate::metrics::record_command_error(Verb::Msg.name(), e.error_code());
            return Err(e.into());
        }
        Err(e) => {
            crate::metrics::record_command_error("invalid", e.error_code());
            return Err(e.into());
        }
    };
    let verb = command.verb();

    let result = match command {
        ClientCommand::Nick(nick) => nick::handle(ctx, &nick).await,
        ClientCommand::List => list::handle(ctx).await,
        ClientCommand::Msg { recipients, body } => {
            messaging::handle(ctx, recipients, &body).await
        }
    };

    if let Err(e) = &result {
        crate::metrics::record_command_error(verb.name(), e.error_code());
    }
    result
}

/// Convenience for callers that only care about client-visible failures.
pub fn reply_for(result: HandlerResult) -> Result<String, HandlerError> {
    match result {
        Ok(reply) => Ok(reply),
        Err(e) => match e.reply_text() {
            Some(text) => Ok(text),
            None => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct Client {
        conn_id: ConnId,
        outbox: Outbox,
        rx: mpsc::Receiver<Arc<str>>,
        state: SessionState,
    }

    impl Client {
        fn new(conn_id: &str) -> Self {
            let (outbox, rx) = mpsc::channel(16);
            Self {
                conn_id: conn_id.to_string(),
                outbox,
                rx,
                state: SessionState::Unnamed,
            }
        }

        async fn line(&mut self, registry: &RegistryHandle, line: &str) -> String {
            let mut ctx = Context {
                conn_id: &self.conn_id,
                registry,
                outbox: &self.outbox,
                state: &mut self.state,
            };
            reply_for(dispatch(&mut ctx, line).await).expect("reply expected")
        }
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let registry = RegistryHandle::spawn(16);
        let mut a = Client::new("127.0.0.1:5001");
        let mut b = Client::new("127.0.0.1:5002");

        assert_eq!(a.line(&registry, "/NICK alice").await, "Nickname set to alice");
        assert_eq!(b.line(&registry, "/NICK bob").await, "Nickname set to bob");
        assert_eq!(a.line(&registry, "/LIST").await, "Users: alice, bob");
        assert_eq!(a.line(&registry, "/MSG * hello").await, "Message sent");

        assert_eq!(&*b.rx.recv().await.unwrap(), "[alice]: hello");
        assert!(a.rx.try_recv().is_err());

        assert_eq!(b.line(&registry, "/NICK alice").await, "Nickname already in use");
        assert_eq!(b.state, SessionState::Named("bob".into()));
    }

    #[tokio::test]
    async fn test_msg_requires_nickname() {
        let registry = RegistryHandle::spawn(16);
        let mut a = Client::new("127.0.0.1:5001");

        assert_eq!(
            a.line(&registry, "/M * hi").await,
            "Set a nickname first using /NICK"
        );
        assert_eq!(
            a.line(&registry, "/MSG").await,
            "Set a nickname first using /NICK"
        );
        assert_eq!(
            a.line(&registry, "/M bob").await,
            "Set a nickname first using /NICK"
        );
    }

    #[tokio::test]
    async fn test_msg_usage_once_named() {
        let registry = RegistryHandle::spawn(16);
        let mut a = Client::new("127.0.0.1:5001");

        a.line(&registry, "/NICK alice").await;
        assert_eq!(
            a.line(&registry, "/MSG").await,
            "Usage: /MSG <recipient(s)> <message>"
        );
        assert_eq!(
            a.line(&registry, "/MSG bob").await,
            "Usage: /MSG <recipient(s)> <message>"
        );
    }

    #[tokio::test]
    async fn test_rename_updates_session() {
        let registry = RegistryHandle::spawn(16);
        let mut a = Client::new("127.0.0.1:5001");

        a.line(&registry, "/N alice").await;
        assert_eq!(a.line(&registry, "/N alicia").await, "Nickname set to alicia");
        assert_eq!(a.state.nick(), Some("alicia"));
        assert_eq!(a.line(&registry, "/L").await, "Users: alicia");
    }

    #[tokio::test]
    async fn test_protocol_errors_are_answered_locally() {
        let registry = RegistryHandle::spawn(16);
        let mut a = Client::new("127.0.0.1:5001");

        assert_eq!(a.line(&registry, "").await, "Invalid command");
        assert_eq!(a.line(&registry, "/JOIN #x").await, "Unknown command");
        assert_eq!(a.line(&registry, "/NICK").await, "Usage: /NICK <nickname>");
        assert_eq!(a.line(&registry, "/LIST").await, "Users: ");
    }

    #[tokio::test]
    async fn test_unavailable_registry_is_fatal() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let registry = RegistryHandle::from_sender(tx);

        let mut a = Client::new("127.0.0.1:5001");
        let mut ctx = Context {
            conn_id: &a.conn_id,
            registry: &registry,
            outbox: &a.outbox,
            state: &mut a.state,
        };
        let err = reply_for(dispatch(&mut ctx, "/LIST").await).unwrap_err();
        assert!(matches!(err, HandlerError::Registry(RegistryError::Unavailable)));
    }
}
