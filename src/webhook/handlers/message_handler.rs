use crate::{
    models::line::{MessageContent, MessageEvent, OutboundMessage},
    services::{
        rich_menu_service::{DIGITAL_CERTIFICATE_PHRASE, DIGITAL_ID_PHRASE},
        LineResult, MessagingChannel,
    },
    webhook::dispatcher::EventOutcome,
};
use tracing::info;

pub const DIGITAL_ID_REPLY: &str = "🆔 デジタルIDサービスを選択されました。\n\nデジタルIDの発行や管理を行います。\n詳細については、こちらのWebページをご確認ください。";
pub const DIGITAL_CERTIFICATE_REPLY: &str = "📜 デジタル証明書サービスを選択されました。\n\n各種証明書の発行や確認を行います。\n詳細については、こちらのWebページをご確認ください。";
pub const NON_TEXT_REPLY: &str = "テキストメッセージを送ってくださいね！";

/// Fixed reply for a rich-menu control phrase, if `text` is one.
pub fn control_reply(text: &str) -> Option<&'static str> {
    match text {
        DIGITAL_ID_PHRASE => Some(DIGITAL_ID_REPLY),
        DIGITAL_CERTIFICATE_PHRASE => Some(DIGITAL_CERTIFICATE_REPLY),
        _ => None,
    }
}

pub fn echo_text(text: &str) -> String {
    format!("あなたは「{}」と言いましたね！", text)
}

/// Builds the reply for an inbound message without sending it.
pub fn reply_for(content: &MessageContent) -> OutboundMessage {
    match content {
        MessageContent::Text { text, .. } => match control_reply(text) {
            Some(reply) => OutboundMessage::text(reply),
            None => OutboundMessage::text(echo_text(text)),
        },
        MessageContent::Unsupported => OutboundMessage::text(NON_TEXT_REPLY),
    }
}

/// Answers a message event: control phrases get their fixed reply, other
/// text is echoed back, anything else gets a prompt to send text.
/// Without a reply token (standby mode) the event is only logged.
pub async fn handle_message_event(
    channel: &dyn MessagingChannel,
    event: &MessageEvent,
) -> LineResult<EventOutcome> {
    let Some(reply_token) = event.reply_token.as_deref() else {
        info!(
            "Message from user {} has no reply token (mode {}), not replying",
            event.source.user_id().unwrap_or("unknown"),
            event.meta.mode.as_deref().unwrap_or("unknown")
        );
        return Ok(EventOutcome::Logged);
    };

    let reply = reply_for(&event.message);
    channel
        .reply_message(reply_token, std::slice::from_ref(&reply))
        .await?;

    info!(
        "Replied to user {}: {}",
        event.source.user_id().unwrap_or("unknown"),
        reply.as_text().unwrap_or_default()
    );
    Ok(EventOutcome::Replied { follow_up: None })
}
