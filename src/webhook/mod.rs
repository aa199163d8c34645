pub mod dispatcher;
pub mod handlers;
pub mod routes;
pub mod signature;

// Re-export main components
pub use dispatcher::{DispatchSummary, EventDispatcher, EventOutcome, FollowUp};
pub use handlers::post_line_webhook;
pub use routes::create_webhook_router;
