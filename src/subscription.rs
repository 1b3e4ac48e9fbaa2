//! # Subscription Transport
//!
//! Client for the cloud platform API. Authenticates every request with an
//! API key/secret header pair; every message operation is scoped to a
//! subscription, either fixed at construction or supplied per call.
//!
//! Beyond posting and reading messages this variant exposes the platform's
//! account surface: listing the subscriptions a key pair can reach and the
//! viewer/installation metadata behind it.

use crate::error::{BoardError, Result};
use crate::layout::Grid;
use crate::transport::{json_body, require, send, CallOptions, Message, MessageReceipt};
use serde::Deserialize;

const BASE_URL: &str = "https://platform.vestaboard.com";

const API_KEY_HEADER: &str = "X-Vestaboard-Api-Key";
const API_SECRET_HEADER: &str = "X-Vestaboard-Api-Secret";

/// One subscription reachable with the configured key pair.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Subscription id, the scope for message calls.
    pub id: String,
    /// Board the subscription targets.
    #[serde(default)]
    pub board_id: Option<String>,
}

/// Viewer/installation metadata for the configured key pair.
#[derive(Clone, Debug, Deserialize)]
pub struct Viewer {
    /// Viewer id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Creation timestamp (epoch milliseconds).
    #[serde(rename = "_created")]
    pub created: i64,
    /// Viewer type reported by the platform.
    #[serde(rename = "type")]
    pub kind: String,
    /// Installation the key pair belongs to.
    pub installation: Installation,
}

/// Installation reference inside a [`Viewer`].
#[derive(Clone, Debug, Deserialize)]
pub struct Installation {
    /// Installation id.
    #[serde(rename = "_id")]
    pub id: String,
}

/// Platform acknowledgement for a posted message.
#[derive(Debug, Deserialize)]
struct PostResponse {
    id: String,
    created: i64,
}

/// Platform response for the current-message read. The layout arrives as
/// a JSON-encoded string embedding the 6×22 array, not as nested JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadResponse {
    current_message: CurrentMessage,
}

#[derive(Debug, Deserialize)]
struct CurrentMessage {
    layout: String,
}

/// Cloud platform client. Construct through [`create`](crate::create).
#[derive(Debug)]
pub struct SubscriptionClient {
    http: reqwest::Client,
    api_key: String,
    api_secret: String,
    subscription_id: Option<String>,
}

impl SubscriptionClient {
    pub(crate) fn new(config: crate::transport::SubscriptionConfig) -> Result<Self> {
        require("api_key", &config.api_key)?;
        require("api_secret", &config.api_secret)?;
        if let Some(id) = &config.subscription_id {
            require("subscription_id", id)?;
        }
        Ok(SubscriptionClient {
            http: reqwest::Client::new(),
            api_key: config.api_key,
            api_secret: config.api_secret,
            subscription_id: config.subscription_id,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", BASE_URL, path))
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_SECRET_HEADER, &self.api_secret)
    }

    /// The subscription id fixed at construction, or a configuration error
    /// for callers that did not fix one.
    fn default_subscription(&self) -> Result<&str> {
        self.subscription_id.as_deref().ok_or_else(|| {
            BoardError::config("no subscription_id configured; use the per-call form")
        })
    }

    /// List the subscriptions reachable with this key pair.
    pub async fn subscriptions(&self, opts: &CallOptions) -> Result<Vec<Subscription>> {
        crate::transport::with_cancel(opts, async {
            let response = send(self.request(reqwest::Method::GET, "/subscriptions"), opts).await?;
            json_body(response).await
        })
        .await
    }

    /// Fetch viewer/installation metadata for this key pair.
    pub async fn viewer(&self, opts: &CallOptions) -> Result<Viewer> {
        crate::transport::with_cancel(opts, async {
            let response = send(self.request(reqwest::Method::GET, "/viewer"), opts).await?;
            json_body(response).await
        })
        .await
    }

    /// Post to the subscription fixed at construction.
    pub async fn post_message(&self, message: &Message, opts: &CallOptions) -> Result<MessageReceipt> {
        let id = self.default_subscription()?.to_string();
        self.post_to(&id, message, opts).await
    }

    /// Post to an explicit subscription.
    pub async fn post_to(
        &self,
        subscription_id: &str,
        message: &Message,
        opts: &CallOptions,
    ) -> Result<MessageReceipt> {
        crate::transport::with_cancel(opts, async {
            tracing::debug!(subscription_id, "posting message via platform api");
            let path = format!("/subscriptions/{}/message", subscription_id);
            let request = self
                .request(reqwest::Method::POST, &path)
                .json(&message.wire_body());
            let response = send(request, opts).await?;
            let ack: PostResponse = json_body(response).await?;
            Ok(MessageReceipt {
                id: Some(ack.id),
                created: Some(ack.created),
            })
        })
        .await
    }

    /// Read the frame currently shown, scoped to the fixed subscription.
    pub async fn read_state(&self, opts: &CallOptions) -> Result<Grid> {
        let id = self.default_subscription()?.to_string();
        self.read_state_of(&id, opts).await
    }

    /// Read the frame currently shown on an explicit subscription.
    pub async fn read_state_of(&self, subscription_id: &str, opts: &CallOptions) -> Result<Grid> {
        crate::transport::with_cancel(opts, async {
            let path = format!("/subscriptions/{}/message", subscription_id);
            let response = send(self.request(reqwest::Method::GET, &path), opts).await?;
            let body: ReadResponse = json_body(response).await?;
            // The platform double-encodes the layout as a JSON string.
            let grid: Grid = serde_json::from_str(&body.current_message.layout)?;
            Ok(grid)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::SubscriptionConfig;

    fn client(subscription_id: Option<&str>) -> SubscriptionClient {
        SubscriptionClient::new(SubscriptionConfig {
            api_key: "key".into(),
            api_secret: "secret".into(),
            subscription_id: subscription_id.map(str::to_string),
        })
        .unwrap()
    }

    #[test]
    fn construction_rejects_blank_credentials() {
        let err = SubscriptionClient::new(SubscriptionConfig {
            api_key: String::new(),
            api_secret: "secret".into(),
            subscription_id: None,
        })
        .unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn fixed_id_form_requires_a_configured_subscription() {
        let client = client(None);
        let err = client.default_subscription().unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));

        assert_eq!(self::client(Some("sub-9")).default_subscription().unwrap(), "sub-9");
    }

    #[test]
    fn read_response_parses_double_encoded_layout() {
        let layout = serde_json::to_string(&Grid::filled(7)).unwrap();
        let body = serde_json::json!({
            "currentMessage": { "layout": layout, "id": "msg-1" }
        })
        .to_string();

        let parsed: ReadResponse = serde_json::from_str(&body).unwrap();
        let grid: Grid = serde_json::from_str(&parsed.current_message.layout).unwrap();
        assert_eq!(grid, Grid::filled(7));
    }

    #[test]
    fn viewer_parses_platform_field_names() {
        let body = r#"{"_id":"v1","_created":1700000000000,"type":"viewer","installation":{"_id":"i1"}}"#;
        let viewer: Viewer = serde_json::from_str(body).unwrap();
        assert_eq!(viewer.id, "v1");
        assert_eq!(viewer.kind, "viewer");
        assert_eq!(viewer.installation.id, "i1");
    }

    #[tokio::test]
    async fn cancelled_post_never_reaches_the_network() {
        let client = client(Some("sub-1"));
        let (handle, token) = crate::transport::CancelToken::new();
        handle.cancel();
        let opts = CallOptions::with_cancel(token);

        let result = client.post_message(&Message::from("HI"), &opts).await;
        assert!(matches!(result, Err(BoardError::Cancelled)));
    }
}
