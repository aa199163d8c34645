use crate::{
    models::line::{FollowEvent, OutboundMessage},
    services::{LineResult, MessagingChannel},
    webhook::dispatcher::{EventOutcome, FollowUp},
};
use tracing::info;

pub const WELCOME_MESSAGE: &str = "フォローありがとうございます！\n\n下のメニューからサービスを選択するか、メッセージを送ってみてください。";

/// Sends the welcome reply. Linking the rich menu is handed back to the
/// dispatcher as a follow-up so its failure cannot touch the reply.
/// A follow without a reply token is only logged.
pub async fn handle_follow_event(
    channel: &dyn MessagingChannel,
    event: &FollowEvent,
) -> LineResult<EventOutcome> {
    let user_id = event.source.user_id();
    let Some(reply_token) = event.reply_token.as_deref() else {
        info!(
            "Follow from user {} has no reply token, not replying",
            user_id.unwrap_or("unknown")
        );
        return Ok(EventOutcome::Logged);
    };

    channel
        .reply_message(reply_token, &[OutboundMessage::text(WELCOME_MESSAGE)])
        .await?;

    info!("👋 Welcome message sent to user {}", user_id.unwrap_or("unknown"));

    Ok(EventOutcome::Replied {
        follow_up: user_id.map(|user_id| FollowUp::LinkRichMenu {
            user_id: user_id.to_string(),
        }),
    })
}
