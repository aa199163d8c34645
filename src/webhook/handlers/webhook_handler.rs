use crate::{
    error::{AppError, Result},
    models::line::WebhookPayload,
    observability::record_webhook_request,
    state::AppState,
    webhook::signature::{self, SIGNATURE_HEADER},
};
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

/// POST /webhook/line
///
/// The raw body is authenticated against `x-line-signature` before it is
/// parsed. Once authenticated the request is acknowledged with 200 whatever
/// happens to individual events.
pub async fn post_line_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    info!("📥 Received LINE webhook request ({} bytes)", body.len());

    let provided_signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !signature::verify(&body, provided_signature, state.channel_secret.expose().as_bytes()) {
        error!("🚫 Invalid signature");
        record_webhook_request("rejected");
        return Err(AppError::Forbidden);
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!("Malformed webhook payload: {}", e);
        record_webhook_request("malformed");
        AppError::bad_request(format!("Invalid webhook payload: {}", e))
    })?;
    record_webhook_request("accepted");

    let summary = state.dispatcher.dispatch(&payload.events).await;
    info!(
        "✅ Webhook processed: {} replied, {} logged, {} skipped, {} failed, {} follow-ups failed",
        summary.replied, summary.logged, summary.skipped, summary.failed, summary.follow_ups_failed
    );

    Ok(Json(WebhookAck { status: "ok" }))
}
