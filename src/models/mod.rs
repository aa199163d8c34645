pub mod line;

// Re-export commonly used LINE types
pub use line::{
    EventSource, MessageContent, OutboundMessage, RichMenu, RichMenuResponse, WebhookEvent,
    WebhookPayload,
};
