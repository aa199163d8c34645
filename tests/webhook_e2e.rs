mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use common::*;
use line_bot_ws::{
    models::line::OutboundMessage,
    webhook::handlers::{follow_handler::WELCOME_MESSAGE, message_handler::DIGITAL_ID_REPLY},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_empty_event_batch_acknowledged() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());

    let response = app
        .oneshot(signed_webhook_request(r#"{"events":[]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn test_text_message_is_echoed() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![text_message_event("reply-1", "U100", "hello")]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let replies = channel.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].0, "reply-1");
    assert_eq!(
        replies[0].1,
        vec![OutboundMessage::text("あなたは「hello」と言いましたね！")]
    );
    assert!(replies[0].1[0].as_text().unwrap().contains("hello"));
    assert_eq!(channel.calls().len(), 1);
}

#[tokio::test]
async fn test_control_phrase_bypasses_echo() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![text_message_event("reply-2", "U100", "デジタルID")]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let replies = channel.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].1, vec![OutboundMessage::text(DIGITAL_ID_REPLY)]);
}

#[tokio::test]
async fn test_invalid_signature_rejected() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![text_message_event("reply-3", "U100", "hello")]);
    let forged = line_bot_ws::webhook::signature::sign(body.as_bytes(), b"not-the-secret").unwrap();

    let response = app
        .oneshot(webhook_request(&body, Some(&forged)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn test_missing_signature_rejected() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![text_message_event("reply-4", "U100", "hello")]);

    let response = app.oneshot(webhook_request(&body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn test_signature_covers_raw_bytes() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let compact = r#"{"events":[]}"#;
    let signature =
        line_bot_ws::webhook::signature::sign(compact.as_bytes(), CHANNEL_SECRET.as_bytes()).unwrap();

    // Same JSON value, different bytes.
    let response = app
        .oneshot(webhook_request(r#"{ "events": [] }"#, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rejection_body_is_generic() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel);

    let response = app
        .oneshot(webhook_request(r#"{"events":[]}"#, Some("bogus")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Forbidden");
    assert!(!body.to_string().contains(CHANNEL_SECRET));
}

#[tokio::test]
async fn test_follow_survives_rich_menu_failure() {
    let channel = Arc::new(RecordingChannel::new().failing_rich_menu_creation());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![follow_event("follow-1", "U200")]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));

    let calls = channel.calls();
    assert_eq!(
        calls[0],
        Call::Reply {
            reply_token: "follow-1".to_string(),
            messages: vec![OutboundMessage::text(WELCOME_MESSAGE)],
        }
    );
    assert!(calls.iter().any(|c| matches!(c, Call::CreateRichMenu { .. })));
    assert!(!calls.iter().any(|c| matches!(c, Call::LinkRichMenu { .. })));
}

#[tokio::test]
async fn test_follow_links_rich_menu() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![follow_event("follow-2", "U201")]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let calls = channel.calls();
    assert_eq!(calls.len(), 4);
    assert!(matches!(calls[0], Call::Reply { .. }));
    assert_eq!(
        calls[1],
        Call::CreateRichMenu {
            name: "デジタルサービスメニュー".to_string()
        }
    );
    assert!(matches!(
        &calls[2],
        Call::SetRichMenuImage { content_type, .. } if content_type == "image/png"
    ));
    assert_eq!(
        calls[3],
        Call::LinkRichMenu {
            user_id: "U201".to_string(),
            rich_menu_id: "richmenu-test-1".to_string()
        }
    );
}

#[tokio::test]
async fn test_unfollow_sends_nothing() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![unfollow_event("U300")]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn test_failed_reply_does_not_fail_request() {
    let channel = Arc::new(RecordingChannel::new().failing_reply_token("expired"));
    let app = test_app(channel.clone());
    let body = webhook_body(vec![
        text_message_event("first", "U1", "one"),
        text_message_event("expired", "U2", "two"),
        text_message_event("third", "U3", "three"),
    ]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tokens: Vec<String> = channel.replies().into_iter().map(|(t, _)| t).collect();
    assert_eq!(tokens, vec!["first", "expired", "third"]);
}

#[tokio::test]
async fn test_malformed_body_with_valid_signature() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());

    let response = app
        .oneshot(signed_webhook_request(r#"{"events": [ {"type": "message"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Bad Request");
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_event_types_are_skipped() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![
        json!({
            "type": "postback",
            "replyToken": "pb-1",
            "source": { "type": "user", "userId": "U5" },
            "postback": { "data": "action=noop" }
        }),
        text_message_event("reply-5", "U5", "after"),
    ]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let replies = channel.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].0, "reply-5");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(Arc::new(RecordingChannel::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "line-bot-ws");
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_webhook_counters() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel);

    let response = app
        .clone()
        .oneshot(signed_webhook_request(r#"{"events":[]}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("line_webhook_requests_total"));
}

#[tokio::test]
async fn test_standby_event_does_not_sink_active_one() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![
        text_message_event("reply-ok", "U1", "hello"),
        standby_message_event("U2", "hi"),
    ]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let replies = channel.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].0, "reply-ok");
    assert_eq!(channel.calls().len(), 1);
}

#[tokio::test]
async fn test_misshapen_event_skipped_rest_of_batch_handled() {
    let channel = Arc::new(RecordingChannel::new());
    let app = test_app(channel.clone());
    let body = webhook_body(vec![
        json!({ "type": "message", "replyToken": "no-message", "source": { "type": "user", "userId": "U1" } }),
        text_message_event("reply-after", "U1", "still here"),
    ]);

    let response = app.oneshot(signed_webhook_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tokens: Vec<String> = channel.replies().into_iter().map(|(t, _)| t).collect();
    assert_eq!(tokens, vec!["reply-after"]);
}
