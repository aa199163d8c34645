use crate::config::{LineConfig, Secret};
use crate::services::{LineApiError, LineClient, MessagingChannel, RichMenuService};
use crate::webhook::EventDispatcher;
use std::sync::Arc;

/// Shared application state.
///
/// Built once at startup and shared read-only across requests. The channel
/// secret is the only credential the HTTP layer sees.
#[derive(Clone)]
pub struct AppState {
    pub channel_secret: Secret,
    pub frontend_url: String,
    pub dispatcher: EventDispatcher,
    pub rich_menus: RichMenuService,
}

impl AppState {
    /// Wires the state against the real LINE Messaging API.
    pub fn new(config: &LineConfig) -> Result<Self, LineApiError> {
        let client = LineClient::new(config)?;
        Ok(Self::with_channel(config, Arc::new(client)))
    }

    /// Wires the state against any messaging channel.
    pub fn with_channel(config: &LineConfig, channel: Arc<dyn MessagingChannel>) -> Self {
        let rich_menus = RichMenuService::new(channel.clone(), config.rich_menu_image_path.clone());
        let dispatcher = EventDispatcher::new(channel, rich_menus.clone());

        AppState {
            channel_secret: config.channel_secret.clone(),
            frontend_url: config.frontend_url.clone(),
            dispatcher,
            rich_menus,
        }
    }
}
