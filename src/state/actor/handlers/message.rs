//! Message fan-out to registered clients.
//!
//! Delivery is a non-blocking `try_send` into each recipient's outbox so a
//! slow client can never stall the actor.

use super::super::{Delivery, Registration, RegistryActor};
use nickrelay_proto::{Recipients, reply};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

impl RegistryActor {
    pub(crate) fn handle_send_message(
        &self,
        sender: &str,
        recipients: &Recipients,
        body: &str,
    ) -> Delivery {
        let line: Arc<str> = Arc::from(reply::delivery(sender, body));
        let mut delivery = Delivery::default();

        match recipients {
            Recipients::Everyone => {
                for (nick, registration) in &self.nicks {
                    if nick == sender {
                        continue;
                    }
                    deliver(nick, registration, &line, &mut delivery);
                }
            }
            Recipients::Named(names) => {
                for nick in names {
                    match self.nicks.get(nick) {
                        Some(registration) => deliver(nick, registration, &line, &mut delivery),
                        None => delivery.unknown.push(nick.clone()),
                    }
                }
            }
        }

        if !delivery.unknown.is_empty() {
            debug!(%sender, unknown = ?delivery.unknown, "Skipped unregistered recipients");
        }
        crate::metrics::record_fanout(delivery.delivered);

        delivery
    }
}

fn deliver(nick: &str, registration: &Registration, line: &Arc<str>, delivery: &mut Delivery) {
    match registration.outbox.try_send(Arc::clone(line)) {
        Ok(()) => delivery.delivered += 1,
        Err(TrySendError::Full(_)) => {
            delivery.dropped += 1;
            crate::metrics::record_dropped_delivery();
            warn!(recipient = %nick, conn = %registration.conn_id, "SendQ full, message dropped");
        }
        Err(TrySendError::Closed(_)) => {
            // The recipient's own read loop will notice and deregister
            delivery.dropped += 1;
            debug!(recipient = %nick, "Outbox closed, message dropped");
        }
    }
}
