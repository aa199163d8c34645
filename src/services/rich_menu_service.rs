use crate::{
    models::line::{RichMenu, RichMenuAction, RichMenuArea, RichMenuBounds, RichMenuResponse, RichMenuSize},
    services::line_client::{LineResult, MessagingChannel},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const DIGITAL_ID_PHRASE: &str = "デジタルID";
pub const DIGITAL_CERTIFICATE_PHRASE: &str = "デジタル証明書";

const MENU_WIDTH: u32 = 2500;
const MENU_HEIGHT: u32 = 1686;

/// Minimal PNG header uploaded when no menu artwork is configured.
pub const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x09, 0xC4, 0x00, 0x00, 0x06, 0x96, 0x08, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Two-pane menu: left half sends the digital ID phrase, right half the certificate phrase.
pub fn digital_services_menu() -> RichMenu {
    let half = MENU_WIDTH / 2;
    RichMenu {
        size: RichMenuSize {
            width: MENU_WIDTH,
            height: MENU_HEIGHT,
        },
        selected: false,
        name: "デジタルサービスメニュー".to_string(),
        chat_bar_text: "メニュー".to_string(),
        areas: vec![
            RichMenuArea {
                bounds: RichMenuBounds {
                    x: 0,
                    y: 0,
                    width: half,
                    height: MENU_HEIGHT,
                },
                action: RichMenuAction::Message {
                    label: None,
                    text: DIGITAL_ID_PHRASE.to_string(),
                },
            },
            RichMenuArea {
                bounds: RichMenuBounds {
                    x: half,
                    y: 0,
                    width: MENU_WIDTH - half,
                    height: MENU_HEIGHT,
                },
                action: RichMenuAction::Message {
                    label: None,
                    text: DIGITAL_CERTIFICATE_PHRASE.to_string(),
                },
            },
        ],
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/png",
    }
}

/// Outcome of a delete-all sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSweep {
    pub listed: usize,
    pub deleted: usize,
}

impl DeleteSweep {
    pub fn is_complete(&self) -> bool {
        self.deleted == self.listed
    }
}

/// Creates, decorates and links rich menus through the messaging channel.
#[derive(Clone)]
pub struct RichMenuService {
    channel: Arc<dyn MessagingChannel>,
    image_path: Option<PathBuf>,
}

impl RichMenuService {
    pub fn new(channel: Arc<dyn MessagingChannel>, image_path: Option<PathBuf>) -> Self {
        Self {
            channel,
            image_path,
        }
    }

    /// Creates the digital-services menu and links it to `user_id`.
    pub async fn setup_for_user(&self, user_id: &str) -> LineResult<String> {
        let rich_menu_id = self.create_digital_services_menu().await?;

        self.channel
            .link_rich_menu_to_user(user_id, &rich_menu_id)
            .await?;

        info!("🔗 Rich menu linked to user {}: {}", user_id, rich_menu_id);
        Ok(rich_menu_id)
    }

    async fn create_digital_services_menu(&self) -> LineResult<String> {
        let rich_menu_id = self.channel.create_rich_menu(&digital_services_menu()).await?;
        info!("Created rich menu: {}", rich_menu_id);

        let (content_type, image) = self.load_image().await;
        let image_size = image.len();
        self.channel
            .set_rich_menu_image(&rich_menu_id, content_type, image)
            .await?;
        info!(
            "Rich menu image uploaded for {} ({} bytes, {})",
            rich_menu_id, image_size, content_type
        );

        Ok(rich_menu_id)
    }

    async fn load_image(&self) -> (&'static str, Vec<u8>) {
        let Some(path) = &self.image_path else {
            return ("image/png", PLACEHOLDER_PNG.to_vec());
        };

        match tokio::fs::read(path).await {
            Ok(bytes) => (content_type_for(path), bytes),
            Err(e) => {
                warn!(
                    "⚠️ Rich menu image {} unreadable ({}), uploading placeholder",
                    path.display(),
                    e
                );
                ("image/png", PLACEHOLDER_PNG.to_vec())
            }
        }
    }

    pub async fn list(&self) -> LineResult<Vec<RichMenuResponse>> {
        self.channel.list_rich_menus().await
    }

    /// Deletes every rich menu on the channel. A failed delete is logged and
    /// the sweep moves on.
    pub async fn delete_all(&self) -> LineResult<DeleteSweep> {
        let menus = self.channel.list_rich_menus().await?;
        let mut deleted = 0;

        for menu in &menus {
            match self.channel.delete_rich_menu(&menu.rich_menu_id).await {
                Ok(()) => {
                    deleted += 1;
                    info!("Deleted rich menu: {}", menu.rich_menu_id);
                }
                Err(e) => {
                    error!("❌ Failed to delete rich menu {}: {}", menu.rich_menu_id, e);
                }
            }
        }

        Ok(DeleteSweep {
            listed: menus.len(),
            deleted,
        })
    }
}
