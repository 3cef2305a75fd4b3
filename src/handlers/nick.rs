//! `/NICK` - claim or change the connection's nickname.

use super::{Context, SessionState};
use crate::error::HandlerResult;
use nickrelay_proto::reply;

pub(super) async fn handle(ctx: &mut Context<'_>, nick: &str) -> HandlerResult {
    let change = ctx
        .registry
        .set_nickname(ctx.conn_id, nick, ctx.outbox.clone())
        .await?;

    *ctx.state = SessionState::Named(change.nick.clone());
    Ok(reply::nickname_set(&change.nick))
}
