use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Inbound webhook payload
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    #[serde(default)]
    pub is_redelivery: bool,
}

/// Envelope fields shared by every event type.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub webhook_event_id: Option<String>,
    #[serde(default)]
    pub delivery_context: DeliveryContext,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventSource {
    User {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Group {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(rename = "userId", default)]
        user_id: Option<String>,
    },
    Room {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId", default)]
        user_id: Option<String>,
    },
}

impl EventSource {
    /// The user behind the event, when the provider discloses one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            EventSource::User { user_id } => Some(user_id),
            EventSource::Group { user_id, .. } | EventSource::Room { user_id, .. } => {
                user_id.as_deref()
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text {
        #[serde(default)]
        id: String,
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

/// Standby-mode events arrive without a reply token.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(default)]
    pub reply_token: Option<String>,
    pub source: EventSource,
    pub message: MessageContent,
    #[serde(flatten)]
    pub meta: EventMeta,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FollowEvent {
    #[serde(default)]
    pub reply_token: Option<String>,
    pub source: EventSource,
    #[serde(flatten)]
    pub meta: EventMeta,
}

/// Unfollow events carry no reply token.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnfollowEvent {
    pub source: EventSource,
    #[serde(flatten)]
    pub meta: EventMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    Message(MessageEvent),
    Follow(FollowEvent),
    Unfollow(UnfollowEvent),
    Other {
        event_type: String,
        source: Option<EventSource>,
    },
    /// An entry that could not be read as the event it claims to be.
    Invalid { event_type: String, reason: String },
}

impl WebhookEvent {
    pub fn event_type(&self) -> &str {
        match self {
            WebhookEvent::Message(_) => "message",
            WebhookEvent::Follow(_) => "follow",
            WebhookEvent::Unfollow(_) => "unfollow",
            WebhookEvent::Other { event_type, .. } | WebhookEvent::Invalid { event_type, .. } => {
                event_type
            }
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            WebhookEvent::Message(e) => e.source.user_id(),
            WebhookEvent::Follow(e) => e.source.user_id(),
            WebhookEvent::Unfollow(e) => e.source.user_id(),
            WebhookEvent::Other { source, .. } => source.as_ref().and_then(|s| s.user_id()),
            WebhookEvent::Invalid { .. } => None,
        }
    }
}

// Each entry is read on its own: a known event type that does not fit its
// shape becomes `Invalid`, and unknown types are kept as `Other`. Neither
// rejects the rest of the batch.
impl<'de> Deserialize<'de> for WebhookEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let Some(event_type) = value.get("type").and_then(|t| t.as_str()).map(str::to_string) else {
            return Ok(WebhookEvent::Invalid {
                event_type: "unknown".to_string(),
                reason: "missing field `type`".to_string(),
            });
        };

        let parsed = match event_type.as_str() {
            "message" => serde_json::from_value(value).map(WebhookEvent::Message),
            "follow" => serde_json::from_value(value).map(WebhookEvent::Follow),
            "unfollow" => serde_json::from_value(value).map(WebhookEvent::Unfollow),
            _ => {
                let source = value
                    .get("source")
                    .cloned()
                    .and_then(|s| serde_json::from_value(s).ok());
                return Ok(WebhookEvent::Other { event_type, source });
            }
        };

        Ok(parsed.unwrap_or_else(|e| WebhookEvent::Invalid {
            event_type,
            reason: e.to_string(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Text { text: String },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OutboundMessage::Text { text } => Some(text),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessageRequest<'a> {
    pub reply_token: &'a str,
    pub messages: &'a [OutboundMessage],
}

#[derive(Debug, Serialize, Clone)]
pub struct PushMessageRequest<'a> {
    pub to: &'a str,
    pub messages: &'a [OutboundMessage],
}

// ---------------------------------------------------------------------------
// Rich menus
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RichMenuSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RichMenuBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RichMenuAction {
    Message {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        text: String,
    },
    Uri {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        uri: String,
    },
    Postback {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        data: String,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RichMenuArea {
    pub bounds: RichMenuBounds,
    pub action: RichMenuAction,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RichMenu {
    pub size: RichMenuSize,
    pub selected: bool,
    pub name: String,
    pub chat_bar_text: String,
    pub areas: Vec<RichMenuArea>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RichMenuResponse {
    pub rich_menu_id: String,
    #[serde(flatten)]
    pub menu: RichMenu,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RichMenuIdResponse {
    pub rich_menu_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RichMenuListResponse {
    #[serde(default)]
    pub richmenus: Vec<RichMenuResponse>,
}
