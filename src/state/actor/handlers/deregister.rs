//! Registration removal on connection teardown.

use super::super::RegistryActor;
use tracing::info;

impl RegistryActor {
    /// Remove the connection's registration, returning the released nickname.
    ///
    /// Unknown connections are a no-op, so duplicate teardown is harmless.
    pub(crate) fn handle_deregister(&mut self, conn_id: &str) -> Option<String> {
        let nick = self.owners.remove(conn_id)?;
        self.nicks.remove(&nick);
        info!(conn = %conn_id, %nick, "Nickname released");
        Some(nick)
    }
}
