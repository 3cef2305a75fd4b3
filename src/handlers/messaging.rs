//! `/MSG` - direct or broadcast messages.

use super::Context;
use crate::error::HandlerResult;
use nickrelay_proto::{ProtocolError, Recipients, reply};
use tracing::debug;

pub(super) async fn handle(ctx: &mut Context<'_>, recipients: Recipients, body: &str) -> HandlerResult {
    let Some(sender) = ctx.state.nick() else {
        return Err(ProtocolError::NicknameRequired.into());
    };

    let delivery = ctx.registry.send_message(sender, recipients, body).await?;
    debug!(
        %sender,
        delivered = delivery.delivered,
        dropped = delivery.dropped,
        unknown = delivery.unknown.len(),
        "Message routed"
    );
    Ok(reply::MESSAGE_SENT.to_string())
}
