pub mod follow_handler;
pub mod message_handler;
pub mod rich_menu_handler;
pub mod unfollow_handler;
pub mod webhook_handler;

// Re-export HTTP handlers for the router
pub use rich_menu_handler::{delete_all_rich_menus, list_rich_menus, setup_rich_menu};
pub use webhook_handler::post_line_webhook;
