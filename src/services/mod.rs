pub mod line_client;
pub mod rich_menu_service;

pub use line_client::{LineApiError, LineClient, LineResult, MessagingChannel};
pub use rich_menu_service::{DeleteSweep, RichMenuService};
