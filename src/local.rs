//! # Local Transport
//!
//! Client for a board reached directly over the LAN. Requests go to the
//! device's local API on port 7000, authenticated by a local API key
//! header.
//!
//! ## Key Bootstrap
//!
//! A device that has never been provisioned only holds a one-time
//! *enablement token*. The first authenticated call exchanges that token
//! for a local API key and memoizes the key for the lifetime of the client
//! instance. The exchange runs at most once: concurrent callers sharing a
//! client instance are serialized through a single-acquisition
//! `tokio::sync::OnceCell`, so a race cannot provision twice.
//!
//! ## Rendering
//!
//! The device accepts only character-code frames, so text messages are
//! encoded client-side through [`layout::encode`](crate::layout::encode)
//! before posting; pre-built grids are sent verbatim.

use crate::error::{BoardError, Result};
use crate::layout::{self, Grid};
use crate::transport::{json_body, require, send, CallOptions, Message, MessageReceipt};
use serde::Deserialize;
use tokio::sync::OnceCell;

const LOCAL_PORT: u16 = 7000;

const LOCAL_KEY_HEADER: &str = "X-Vestaboard-Local-Api-Key";
const ENABLEMENT_TOKEN_HEADER: &str = "X-Vestaboard-Local-Api-Enablement-Token";

/// Response to the enablement exchange.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnablementResponse {
    api_key: String,
}

/// Response to the current-message read.
#[derive(Debug, Deserialize)]
struct ReadResponse {
    message: Grid,
}

/// LAN device client. Construct through [`create`](crate::create).
#[derive(Debug)]
pub struct LocalClient {
    http: reqwest::Client,
    ip_address: String,
    enablement_token: Option<String>,
    // Memoized local API key: pre-filled when configured directly, or
    // populated once by the enablement exchange.
    api_key: OnceCell<String>,
}

impl LocalClient {
    pub(crate) fn new(config: crate::transport::LocalConfig) -> Result<Self> {
        require("ip_address", &config.ip_address)?;

        let api_key = match &config.local_api_key {
            Some(key) => {
                require("local_api_key", key)?;
                OnceCell::new_with(Some(key.clone()))
            }
            None => OnceCell::new(),
        };

        if api_key.get().is_none() {
            match &config.enablement_token {
                Some(token) => require("enablement_token", token)?,
                None => {
                    return Err(BoardError::config(
                        "local mode requires a local_api_key or an enablement_token",
                    ))
                }
            }
        }

        Ok(LocalClient {
            http: reqwest::Client::new(),
            ip_address: config.ip_address,
            enablement_token: config.enablement_token,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}:{}/local-api/{}", self.ip_address, LOCAL_PORT, path)
    }

    /// The memoized local API key, running the one-time enablement
    /// exchange if no key was configured.
    async fn api_key(&self, opts: &CallOptions) -> Result<&str> {
        let key = self
            .api_key
            .get_or_try_init(|| async {
                // Only reachable when construction validated a token.
                let token = self.enablement_token.as_deref().ok_or_else(|| {
                    BoardError::config("no local_api_key and no enablement_token")
                })?;

                tracing::debug!(ip = %self.ip_address, "exchanging enablement token for local api key");
                let request = self
                    .http
                    .post(self.url("enablement/start"))
                    .header(ENABLEMENT_TOKEN_HEADER, token);
                let response = send(request, opts).await?;
                let body: EnablementResponse = json_body(response).await?;
                Ok::<_, BoardError>(body.api_key)
            })
            .await?;
        Ok(key)
    }

    /// Post a message to the device. Text is encoded into a frame
    /// client-side; the device has no server-side renderer.
    pub async fn post_message(&self, message: &Message, opts: &CallOptions) -> Result<MessageReceipt> {
        crate::transport::with_cancel(opts, async {
            let frame = match message {
                Message::Text(text) => layout::encode(text),
                Message::Grid(grid) => *grid,
            };

            let key = self.api_key(opts).await?;
            tracing::debug!(ip = %self.ip_address, "posting frame to local device");
            let request = self
                .http
                .post(self.url("message"))
                .header(LOCAL_KEY_HEADER, key)
                .json(&frame);
            send(request, opts).await?;
            // The device only acknowledges success; there is no receipt
            // metadata to surface.
            Ok(MessageReceipt::default())
        })
        .await
    }

    /// Read the frame the device is currently showing.
    pub async fn read_state(&self, opts: &CallOptions) -> Result<Grid> {
        crate::transport::with_cancel(opts, async {
            let key = self.api_key(opts).await?;
            let request = self
                .http
                .get(self.url("message"))
                .header(LOCAL_KEY_HEADER, key);
            let response = send(request, opts).await?;
            let body: ReadResponse = json_body(response).await?;
            Ok(body.message)
        })
        .await
    }
}
