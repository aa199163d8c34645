use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use super::handlers::{delete_all_rich_menus, list_rich_menus, post_line_webhook, setup_rich_menu};

/// Creates the router for the LINE webhook and rich-menu endpoints
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhook/line", post(post_line_webhook))
        .route("/webhook/rich-menu/setup/:user_id", post(setup_rich_menu))
        .route("/webhook/rich-menu/all", delete(delete_all_rich_menus))
        .route("/webhook/rich-menu/list", get(list_rich_menus))
}
