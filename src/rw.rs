//! # Read/Write-Key Transport
//!
//! Client for the cloud read/write API: one fixed endpoint tied to a
//! single board, authenticated by a single key header. Despite the key's
//! name, this surface is write-only — reads fail with
//! [`BoardError::Unsupported`] without ever touching the network.

use crate::error::{BoardError, Result};
use crate::layout::Grid;
use crate::transport::{json_body, require, send, CallOptions, Message, MessageReceipt};
use serde::Deserialize;

const RW_URL: &str = "https://rw.vestaboard.com/";

const RW_KEY_HEADER: &str = "X-Vestaboard-Read-Write-Key";

/// Acknowledgement shape for the read/write endpoint.
#[derive(Debug, Deserialize)]
struct RwAck {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    created: Option<i64>,
}

/// Read/write-key client. Construct through [`create`](crate::create).
#[derive(Debug)]
pub struct RwClient {
    http: reqwest::Client,
    key: String,
}

impl RwClient {
    pub(crate) fn new(config: crate::transport::RwConfig) -> Result<Self> {
        require("api_read_write_key", &config.api_read_write_key)?;
        Ok(RwClient {
            http: reqwest::Client::new(),
            key: config.api_read_write_key,
        })
    }

    /// Post a message (text or pre-built frame) to the board.
    pub async fn post_message(&self, message: &Message, opts: &CallOptions) -> Result<MessageReceipt> {
        crate::transport::with_cancel(opts, async {
            tracing::debug!("posting message via rw api");
            let request = self
                .http
                .post(RW_URL)
                .header(RW_KEY_HEADER, &self.key)
                .json(&message.wire_body());
            let response = send(request, opts).await?;
            let ack: RwAck = json_body(response).await?;
            Ok(MessageReceipt {
                id: ack.id,
                created: ack.created,
            })
        })
        .await
    }

    /// Always fails: the read/write key carries no read capability, so no
    /// request is issued.
    pub fn read_state(&self) -> Result<Grid> {
        Err(BoardError::Unsupported(
            "the rw transport is write-only and cannot read board state",
        ))
    }
}
