// ============================================================================
// PROMETHEUS METRICS
// ============================================================================

use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    // ========================================================================
    // HTTP REQUEST METRICS
    // ========================================================================

    /// Total HTTP requests by method, endpoint and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "endpoint", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "endpoint"],
        vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // ========================================================================
    // WEBHOOK METRICS
    // ========================================================================

    /// Inbound webhook deliveries: accepted, rejected (bad signature) or malformed
    pub static ref WEBHOOK_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "line_webhook_requests_total",
        "Inbound LINE webhook requests by outcome",
        &["outcome"]
    )
    .unwrap();

    /// Webhook events by type and terminal state
    pub static ref WEBHOOK_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "line_webhook_events_total",
        "Dispatched LINE webhook events by type and outcome",
        &["event_type", "outcome"]
    )
    .unwrap();

    // ========================================================================
    // OUTBOUND LINE API METRICS
    // ========================================================================

    pub static ref LINE_API_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "line_api_calls_total",
        "Outbound LINE Messaging API calls by operation and status",
        &["operation", "status"]
    )
    .unwrap();
}

pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, endpoint])
        .observe(duration_secs);
}

pub fn record_webhook_request(outcome: &str) {
    WEBHOOK_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_webhook_event(event_type: &str, outcome: &str) {
    // Unknown provider event types collapse into one label value.
    let event_type = match event_type {
        "message" | "follow" | "unfollow" => event_type,
        _ => "other",
    };
    WEBHOOK_EVENTS_TOTAL
        .with_label_values(&[event_type, outcome])
        .inc();
}

pub fn record_line_api_call(operation: &str, status: &str) {
    LINE_API_CALLS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
}
