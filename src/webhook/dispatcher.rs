use crate::{
    models::line::WebhookEvent,
    observability::record_webhook_event,
    services::{MessagingChannel, RichMenuService},
    webhook::handlers::{follow_handler, message_handler, unfollow_handler},
};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Work a handler asks for after its primary reply has gone out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    LinkRichMenu { user_id: String },
}

/// Terminal state of a successfully handled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Replied { follow_up: Option<FollowUp> },
    /// Nothing was sent; the event was only logged.
    Logged,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub replied: usize,
    pub logged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub follow_ups_failed: usize,
}

/// Routes authenticated webhook events to their handlers.
#[derive(Clone)]
pub struct EventDispatcher {
    channel: Arc<dyn MessagingChannel>,
    rich_menus: RichMenuService,
}

impl EventDispatcher {
    pub fn new(channel: Arc<dyn MessagingChannel>, rich_menus: RichMenuService) -> Self {
        Self {
            channel,
            rich_menus,
        }
    }

    /// Handles `events` in order. A failing event is logged and counted, and
    /// the rest of the batch still runs. Follow-up tasks run on their own
    /// tasks and are awaited before returning.
    pub async fn dispatch(&self, events: &[WebhookEvent]) -> DispatchSummary {
        info!("Received {} events", events.len());

        let mut summary = DispatchSummary::default();
        let mut follow_ups = JoinSet::new();

        for (index, event) in events.iter().enumerate() {
            let event_type = event.event_type();
            info!("Processing event #{}: {}", index, event_type);

            let result = match event {
                WebhookEvent::Message(message_event) => {
                    if message_event.meta.delivery_context.is_redelivery {
                        info!("🔁 Redelivered message event #{}", index);
                    }
                    message_handler::handle_message_event(self.channel.as_ref(), message_event).await
                }
                WebhookEvent::Follow(follow_event) => {
                    follow_handler::handle_follow_event(self.channel.as_ref(), follow_event).await
                }
                WebhookEvent::Unfollow(unfollow_event) => {
                    Ok(unfollow_handler::handle_unfollow_event(unfollow_event))
                }
                WebhookEvent::Other { event_type, .. } => {
                    info!("Unknown event type: {}", event_type);
                    summary.skipped += 1;
                    record_webhook_event(event_type, "skipped");
                    continue;
                }
                WebhookEvent::Invalid { event_type, reason } => {
                    warn!("⚠️ Skipping unreadable {} event #{}: {}", event_type, index, reason);
                    summary.skipped += 1;
                    record_webhook_event(event_type, "skipped");
                    continue;
                }
            };

            match result {
                Ok(EventOutcome::Replied { follow_up }) => {
                    summary.replied += 1;
                    record_webhook_event(event_type, "replied");
                    if let Some(follow_up) = follow_up {
                        self.schedule(&mut follow_ups, follow_up);
                    }
                }
                Ok(EventOutcome::Logged) => {
                    summary.logged += 1;
                    record_webhook_event(event_type, "logged");
                }
                Err(e) => {
                    summary.failed += 1;
                    record_webhook_event(event_type, "failed");
                    error!("❌ Error handling {} event #{}: {}", event_type, index, e);
                }
            }
        }

        while let Some(joined) = follow_ups.join_next().await {
            match joined {
                Ok(true) => {}
                Ok(false) => summary.follow_ups_failed += 1,
                Err(e) => {
                    summary.follow_ups_failed += 1;
                    error!("❌ Follow-up task aborted: {}", e);
                }
            }
        }

        summary
    }

    fn schedule(&self, follow_ups: &mut JoinSet<bool>, follow_up: FollowUp) {
        match follow_up {
            FollowUp::LinkRichMenu { user_id } => {
                let rich_menus = self.rich_menus.clone();
                follow_ups.spawn(async move {
                    match rich_menus.setup_for_user(&user_id).await {
                        Ok(_) => true,
                        Err(e) => {
                            warn!("⚠️ Failed to setup rich menu for user {}: {}", user_id, e);
                            false
                        }
                    }
                });
            }
        }
    }
}
