use crate::{
    config::{LineConfig, Secret},
    models::line::{
        OutboundMessage, PushMessageRequest, ReplyMessageRequest, RichMenu, RichMenuIdResponse,
        RichMenuListResponse, RichMenuResponse,
    },
    observability::record_line_api_call,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::borrow::Cow;
use tracing::{debug, error, info};

pub type LineResult<T> = std::result::Result<T, LineApiError>;

#[derive(Debug, thiserror::Error)]
pub enum LineApiError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LINE API returned {status} for {operation}: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid id for a LINE API path: {value:?}")]
    InvalidPathSegment { value: String },
}

/// Escapes an id for use as one URL path segment. Ids that would still read
/// as dot segments after escaping are refused.
fn path_segment(value: &str) -> LineResult<Cow<'_, str>> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(LineApiError::InvalidPathSegment {
            value: value.to_string(),
        });
    }
    Ok(urlencoding::encode(value))
}

/// Outbound side of the bot: everything sent to the messaging provider.
///
/// Implementations surface failures to the caller; deciding whether a
/// failure is fatal belongs to the dispatcher.
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    /// Replies using a single-use reply token.
    async fn reply_message(&self, reply_token: &str, messages: &[OutboundMessage]) -> LineResult<()>;

    /// Sends to a user directly. No token or expiry involved.
    async fn push_message(&self, to: &str, messages: &[OutboundMessage]) -> LineResult<()>;

    /// Creates a rich menu and returns its id.
    async fn create_rich_menu(&self, menu: &RichMenu) -> LineResult<String>;

    async fn set_rich_menu_image(
        &self,
        rich_menu_id: &str,
        content_type: &str,
        image: Vec<u8>,
    ) -> LineResult<()>;

    async fn link_rich_menu_to_user(&self, user_id: &str, rich_menu_id: &str) -> LineResult<()>;

    async fn list_rich_menus(&self) -> LineResult<Vec<RichMenuResponse>>;

    async fn delete_rich_menu(&self, rich_menu_id: &str) -> LineResult<()>;
}

/// LINE Messaging API client backed by reqwest.
#[derive(Clone)]
pub struct LineClient {
    http_client: Client,
    access_token: Secret,
    api_base_url: String,
    data_api_base_url: String,
}

impl LineClient {
    pub fn new(config: &LineConfig) -> LineResult<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("line-bot-ws/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            access_token: config.channel_access_token.clone(),
            api_base_url: config.api_base_url.clone(),
            data_api_base_url: config.data_api_base_url.clone(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Sends the request with the channel token and maps non-2xx statuses to errors.
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> LineResult<Response> {
        let response = match request.bearer_auth(self.access_token.expose()).send().await {
            Ok(response) => response,
            Err(e) => {
                record_line_api_call(operation, "transport_error");
                error!("❌ LINE API {} request failed: {}", operation, e);
                return Err(LineApiError::Http(e));
            }
        };

        let status = response.status();
        record_line_api_call(operation, status.as_str());

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("❌ LINE API {} failed (status {}): {}", operation, status, body);
            return Err(LineApiError::Api {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        debug!("LINE API {} succeeded with status {}", operation, status);
        Ok(response)
    }
}

#[async_trait]
impl MessagingChannel for LineClient {
    async fn reply_message(&self, reply_token: &str, messages: &[OutboundMessage]) -> LineResult<()> {
        let request_body = ReplyMessageRequest {
            reply_token,
            messages,
        };
        let request = self
            .http_client
            .post(self.api_url("/v2/bot/message/reply"))
            .json(&request_body);

        self.send("reply_message", request).await?;
        Ok(())
    }

    async fn push_message(&self, to: &str, messages: &[OutboundMessage]) -> LineResult<()> {
        let request_body = PushMessageRequest { to, messages };
        let request = self
            .http_client
            .post(self.api_url("/v2/bot/message/push"))
            .json(&request_body);

        self.send("push_message", request).await?;
        info!("Push message sent to user {}", to);
        Ok(())
    }

    async fn create_rich_menu(&self, menu: &RichMenu) -> LineResult<String> {
        let request = self
            .http_client
            .post(self.api_url("/v2/bot/richmenu"))
            .json(menu);

        let response = self.send("create_rich_menu", request).await?;
        let created = response.json::<RichMenuIdResponse>().await?;
        Ok(created.rich_menu_id)
    }

    async fn set_rich_menu_image(
        &self,
        rich_menu_id: &str,
        content_type: &str,
        image: Vec<u8>,
    ) -> LineResult<()> {
        // Image uploads go to the data API host, not the regular one.
        let url = format!(
            "{}/v2/bot/richmenu/{}/content",
            self.data_api_base_url,
            path_segment(rich_menu_id)?
        );
        let request = self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image);

        self.send("set_rich_menu_image", request).await?;
        Ok(())
    }

    async fn link_rich_menu_to_user(&self, user_id: &str, rich_menu_id: &str) -> LineResult<()> {
        let request = self.http_client.post(self.api_url(&format!(
            "/v2/bot/user/{}/richmenu/{}",
            path_segment(user_id)?,
            path_segment(rich_menu_id)?
        )));

        self.send("link_rich_menu_to_user", request).await?;
        Ok(())
    }

    async fn list_rich_menus(&self) -> LineResult<Vec<RichMenuResponse>> {
        let request = self.http_client.get(self.api_url("/v2/bot/richmenu/list"));

        let response = self.send("list_rich_menus", request).await?;
        let list = response.json::<RichMenuListResponse>().await?;
        Ok(list.richmenus)
    }

    async fn delete_rich_menu(&self, rich_menu_id: &str) -> LineResult<()> {
        let request = self
            .http_client
            .delete(self.api_url(&format!("/v2/bot/richmenu/{}", path_segment(rich_menu_id)?)));

        self.send("delete_rich_menu", request).await?;
        Ok(())
    }
}
