pub mod endpoints;
pub mod metrics;
pub mod middleware;

pub use endpoints::{metrics_handler, monitoring_router};
pub use metrics::{record_http_request, record_line_api_call, record_webhook_event, record_webhook_request};
pub use middleware::metrics_middleware;
