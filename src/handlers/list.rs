//! `/LIST` - show registered nicknames.

use super::Context;
use crate::error::HandlerResult;
use nickrelay_proto::reply;

pub(super) async fn handle(ctx: &mut Context<'_>) -> HandlerResult {
    let nicks = ctx.registry.list_users().await?;
    Ok(reply::users(&nicks))
}
