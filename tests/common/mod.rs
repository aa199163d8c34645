#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{self, Request},
    Router,
};
use line_bot_ws::{
    config::LineConfig,
    create_app_router,
    models::line::{OutboundMessage, RichMenu, RichMenuResponse},
    services::{LineApiError, LineResult, MessagingChannel},
    state::AppState,
    webhook::signature,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const CHANNEL_SECRET: &str = "test-channel-secret";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Reply {
        reply_token: String,
        messages: Vec<OutboundMessage>,
    },
    Push {
        to: String,
        messages: Vec<OutboundMessage>,
    },
    CreateRichMenu {
        name: String,
    },
    SetRichMenuImage {
        rich_menu_id: String,
        content_type: String,
        size: usize,
    },
    LinkRichMenu {
        user_id: String,
        rich_menu_id: String,
    },
    ListRichMenus,
    DeleteRichMenu {
        rich_menu_id: String,
    },
}

/// Messaging channel that records every call and fails on demand.
#[derive(Default)]
pub struct RecordingChannel {
    calls: Mutex<Vec<Call>>,
    failing_reply_tokens: HashSet<String>,
    fail_rich_menu_creation: bool,
    existing_menus: Vec<RichMenuResponse>,
    failing_deletes: HashSet<String>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reply_token(mut self, token: &str) -> Self {
        self.failing_reply_tokens.insert(token.to_string());
        self
    }

    pub fn failing_rich_menu_creation(mut self) -> Self {
        self.fail_rich_menu_creation = true;
        self
    }

    pub fn with_existing_menu(mut self, rich_menu_id: &str) -> Self {
        self.existing_menus.push(RichMenuResponse {
            rich_menu_id: rich_menu_id.to_string(),
            menu: line_bot_ws::services::rich_menu_service::digital_services_menu(),
        });
        self
    }

    pub fn failing_delete(mut self, rich_menu_id: &str) -> Self {
        self.failing_deletes.insert(rich_menu_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<(String, Vec<OutboundMessage>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Reply {
                    reply_token,
                    messages,
                } => Some((reply_token, messages)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn api_error(operation: &'static str, status: u16, body: &str) -> LineApiError {
        LineApiError::Api {
            operation,
            status,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl MessagingChannel for RecordingChannel {
    async fn reply_message(&self, reply_token: &str, messages: &[OutboundMessage]) -> LineResult<()> {
        self.record(Call::Reply {
            reply_token: reply_token.to_string(),
            messages: messages.to_vec(),
        });
        if self.failing_reply_tokens.contains(reply_token) {
            return Err(Self::api_error("reply_message", 400, "Invalid reply token"));
        }
        Ok(())
    }

    async fn push_message(&self, to: &str, messages: &[OutboundMessage]) -> LineResult<()> {
        self.record(Call::Push {
            to: to.to_string(),
            messages: messages.to_vec(),
        });
        Ok(())
    }

    async fn create_rich_menu(&self, menu: &RichMenu) -> LineResult<String> {
        self.record(Call::CreateRichMenu {
            name: menu.name.clone(),
        });
        if self.fail_rich_menu_creation {
            return Err(Self::api_error("create_rich_menu", 500, "internal error"));
        }
        Ok("richmenu-test-1".to_string())
    }

    async fn set_rich_menu_image(
        &self,
        rich_menu_id: &str,
        content_type: &str,
        image: Vec<u8>,
    ) -> LineResult<()> {
        self.record(Call::SetRichMenuImage {
            rich_menu_id: rich_menu_id.to_string(),
            content_type: content_type.to_string(),
            size: image.len(),
        });
        Ok(())
    }

    async fn link_rich_menu_to_user(&self, user_id: &str, rich_menu_id: &str) -> LineResult<()> {
        self.record(Call::LinkRichMenu {
            user_id: user_id.to_string(),
            rich_menu_id: rich_menu_id.to_string(),
        });
        Ok(())
    }

    async fn list_rich_menus(&self) -> LineResult<Vec<RichMenuResponse>> {
        self.record(Call::ListRichMenus);
        Ok(self.existing_menus.clone())
    }

    async fn delete_rich_menu(&self, rich_menu_id: &str) -> LineResult<()> {
        self.record(Call::DeleteRichMenu {
            rich_menu_id: rich_menu_id.to_string(),
        });
        if self.failing_deletes.contains(rich_menu_id) {
            return Err(Self::api_error("delete_rich_menu", 404, "Not found"));
        }
        Ok(())
    }
}

pub fn test_config() -> LineConfig {
    LineConfig::from_lookup(|key| match key {
        "LINE_CHANNEL_SECRET" => Some(CHANNEL_SECRET.to_string()),
        "LINE_CHANNEL_ACCESS_TOKEN" => Some("test-access-token".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn test_app(channel: Arc<RecordingChannel>) -> Router {
    let state = AppState::with_channel(&test_config(), channel);
    create_app_router(Arc::new(state))
}

pub fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(http::Method::POST)
        .uri("/webhook/line")
        .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    if let Some(signature) = signature {
        builder = builder.header("x-line-signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn signed_webhook_request(body: &str) -> Request<Body> {
    let signature = signature::sign(body.as_bytes(), CHANNEL_SECRET.as_bytes()).unwrap();
    webhook_request(body, Some(&signature))
}

pub fn text_message_event(reply_token: &str, user_id: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1700000000000i64,
        "webhookEventId": format!("evt-{}", reply_token),
        "deliveryContext": { "isRedelivery": false },
        "replyToken": reply_token,
        "source": { "type": "user", "userId": user_id },
        "message": { "id": "325708", "type": "text", "text": text }
    })
}

/// A message delivered while another channel holds the chat: no reply token.
pub fn standby_message_event(user_id: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "message",
        "mode": "standby",
        "timestamp": 1700000000000i64,
        "webhookEventId": format!("evt-standby-{}", user_id),
        "deliveryContext": { "isRedelivery": false },
        "source": { "type": "user", "userId": user_id },
        "message": { "id": "325709", "type": "text", "text": text }
    })
}

pub fn follow_event(reply_token: &str, user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "follow",
        "mode": "active",
        "timestamp": 1700000000000i64,
        "replyToken": reply_token,
        "source": { "type": "user", "userId": user_id }
    })
}

pub fn unfollow_event(user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "unfollow",
        "mode": "active",
        "timestamp": 1700000000000i64,
        "source": { "type": "user", "userId": user_id }
    })
}

pub fn webhook_body(events: Vec<serde_json::Value>) -> String {
    serde_json::json!({ "destination": "Ubot0000", "events": events }).to_string()
}
