use crate::{models::line::UnfollowEvent, webhook::dispatcher::EventOutcome};
use tracing::info;

// Unfollow events have no reply token, so there is nothing to send.
pub fn handle_unfollow_event(event: &UnfollowEvent) -> EventOutcome {
    info!(
        "User {} unfollowed the bot",
        event.source.user_id().unwrap_or("unknown")
    );
    EventOutcome::Logged
}
