//! Nickname claim and rename.

use super::super::{ConnId, NickChange, Outbox, Registration, RegistryActor};
use crate::error::RegistryError;
use tracing::info;

impl RegistryActor {
    pub(crate) fn handle_set_nickname(
        &mut self,
        conn_id: ConnId,
        nick: String,
        outbox: Outbox,
    ) -> Result<NickChange, RegistryError> {
        if let Some(existing) = self.nicks.get_mut(&nick) {
            if existing.conn_id != conn_id {
                return Err(RegistryError::NameTaken(nick));
            }
            // Same connection asking for the name it already holds
            existing.outbox = outbox;
            return Ok(NickChange {
                previous: Some(nick.clone()),
                nick,
            });
        }

        // Remove-then-insert happens within this one event, so no other
        // command observes the connection holding zero or two names.
        let previous = self.owners.remove(&conn_id);
        if let Some(old) = &previous {
            self.nicks.remove(old);
            info!(conn = %conn_id, from = %old, to = %nick, "Nickname changed");
        } else {
            info!(conn = %conn_id, %nick, "Nickname set");
        }

        self.owners.insert(conn_id.clone(), nick.clone());
        self.nicks.insert(nick.clone(), Registration { conn_id, outbox });

        Ok(NickChange { previous, nick })
    }
}
