//! # Transport Core
//!
//! The polymorphic client surface over the three ways a message can reach
//! a board, plus the factory that is the only public constructor.
//!
//! ## Variants
//!
//! - **Subscription**: cloud platform endpoint, key/secret header pair,
//!   every call scoped to a subscription id. Read and write.
//! - **ReadWrite**: cloud endpoint tied to one board, single key header.
//!   Write only — reads fail with [`BoardError::Unsupported`] before any
//!   request is made.
//! - **Local**: direct HTTP to a device on the LAN, authenticated by a
//!   local API key (pre-shared, or bootstrapped once from an enablement
//!   token). Read and write.
//!
//! The set is closed: [`BoardClient`] is an enum, and the factory matches
//! mode against config shape exhaustively, so a new variant cannot be
//! silently mis-routed.
//!
//! ## Call Model
//!
//! Every network operation takes a [`CallOptions`]: an optional per-request
//! deadline and an optional [`CancelToken`]. Cancellation aborts the
//! in-flight request by dropping it and surfaces [`BoardError::Cancelled`],
//! never a generic transport error. Nothing is retried internally; retry
//! and fallback policy is the caller's.

use crate::error::{BoardError, Result};
use crate::layout::Grid;
use crate::local::LocalClient;
use crate::rw::RwClient;
use crate::subscription::SubscriptionClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Which transport/auth scheme a client speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Cloud platform API, key/secret pair, subscription-scoped.
    Subscription,
    /// Cloud read/write API, single key, one board, write-only.
    Rw,
    /// Direct LAN access to the device.
    Local,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Subscription => "subscription",
            Mode::Rw => "rw",
            Mode::Local => "local",
        };
        f.write_str(name)
    }
}

/// Credentials for the Subscription variant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Platform API key, sent as `X-Vestaboard-Api-Key`.
    pub api_key: String,
    /// Platform API secret, sent as `X-Vestaboard-Api-Secret`.
    pub api_secret: String,
    /// Subscription to scope calls to. May be omitted and supplied per
    /// call instead.
    #[serde(default)]
    pub subscription_id: Option<String>,
}

/// Credentials for the ReadWrite variant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RwConfig {
    /// Read/write key, sent as `X-Vestaboard-Read-Write-Key`.
    pub api_read_write_key: String,
}

/// Credentials for the Local variant.
///
/// Requires the device IP plus *either* a pre-shared local API key or a
/// one-time enablement token that the client exchanges for a key on first
/// use.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Device address on the local network.
    pub ip_address: String,
    /// Pre-shared local API key, if already provisioned.
    #[serde(default)]
    pub local_api_key: Option<String>,
    /// One-time token to bootstrap a local API key.
    #[serde(default)]
    pub enablement_token: Option<String>,
}

/// One of the three credential shapes. Exactly one shape is active per
/// client; the shape is fixed at construction and never coerced.
#[derive(Clone, Debug)]
pub enum ClientConfig {
    /// Subscription-shaped credentials.
    Subscription(SubscriptionConfig),
    /// ReadWrite-shaped credentials.
    ReadWrite(RwConfig),
    /// Local-shaped credentials.
    Local(LocalConfig),
}

impl ClientConfig {
    /// Mode this shape belongs to, for mismatch diagnostics.
    pub fn mode(&self) -> Mode {
        match self {
            ClientConfig::Subscription(_) => Mode::Subscription,
            ClientConfig::ReadWrite(_) => Mode::Rw,
            ClientConfig::Local(_) => Mode::Local,
        }
    }
}

/// A message bound for the board: plain text (rendered into tiles by the
/// service or, on the Local transport, by the client) or a pre-built
/// [`Grid`] sent verbatim.
#[derive(Clone, Debug)]
pub enum Message {
    /// Free-form text, subject to encoding.
    Text(String),
    /// A complete frame, sent as-is.
    Grid(Grid),
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<Grid> for Message {
    fn from(grid: Grid) -> Self {
        Message::Grid(grid)
    }
}

/// JSON body for the cloud write endpoints: `{"text": …}` or
/// `{"characters": [[…]]}` depending on what the caller handed us.
#[derive(Serialize)]
#[serde(untagged)]
pub(crate) enum MessageBody<'a> {
    /// Server-side rendering from text.
    Text {
        /// The message text.
        text: &'a str,
    },
    /// A pre-built frame.
    Characters {
        /// Row-major 6×22 character codes.
        characters: &'a Grid,
    },
}

impl Message {
    pub(crate) fn wire_body(&self) -> MessageBody<'_> {
        match self {
            Message::Text(text) => MessageBody::Text { text },
            Message::Grid(grid) => MessageBody::Characters { characters: grid },
        }
    }
}

/// What the service acknowledged about a posted message.
///
/// The three transports return different receipt shapes; this is their
/// common denominator. Fields the variant does not report stay `None`
/// (the Local device only acknowledges success).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageReceipt {
    /// Service-assigned message id, where the transport reports one.
    pub id: Option<String>,
    /// Creation timestamp (epoch milliseconds), where reported.
    pub created: Option<i64>,
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Fires the paired [`CancelToken`]. Obtained from [`CancelToken::new`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent; safe to call from another task.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Caller-provided cancellation signal, checked while a request is in
/// flight. Cloning is cheap; clones observe the same signal.
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Create a token and the handle that fires it.
    pub fn new() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// True once the paired handle has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when cancellation fires. Pends forever if the handle is
    /// dropped without firing, so a dropped handle never aborts a call.
    pub(crate) async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Per-call knobs: an optional deadline applied to the underlying request
/// and an optional cancellation token. `CallOptions::default()` means
/// "no deadline, not cancellable" — timeout enforcement is otherwise the
/// caller's responsibility.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    /// Upper bound on the whole request, enforced by the HTTP client.
    pub deadline: Option<Duration>,
    /// Cooperative cancellation signal.
    pub cancel: Option<CancelToken>,
}

impl CallOptions {
    /// Options with only a deadline set.
    pub fn with_deadline(deadline: Duration) -> Self {
        CallOptions {
            deadline: Some(deadline),
            cancel: None,
        }
    }

    /// Options with only a cancellation token set.
    pub fn with_cancel(cancel: CancelToken) -> Self {
        CallOptions {
            deadline: None,
            cancel: Some(cancel),
        }
    }
}

/// Race `operation` against the cancellation signal in `opts`.
///
/// On cancellation the operation future is dropped, which aborts any
/// in-flight request, and the caller sees [`BoardError::Cancelled`]. The
/// race is biased toward the signal so an already-cancelled token never
/// lets a request start.
pub(crate) async fn with_cancel<T>(
    opts: &CallOptions,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    match &opts.cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(BoardError::Cancelled),
                result = operation => result,
            }
        }
        None => operation.await,
    }
}

// ---------------------------------------------------------------------------
// Shared request plumbing
// ---------------------------------------------------------------------------

/// Issue a prepared request, applying the per-call deadline, and map a
/// non-success status to [`BoardError::Status`] with the response body
/// preserved for diagnostics.
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    opts: &CallOptions,
) -> Result<reqwest::Response> {
    let request = match opts.deadline {
        Some(deadline) => request.timeout(deadline),
        None => request,
    };

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "board request rejected");
        return Err(BoardError::Status {
            status: status.as_u16(),
            body,
        });
    }

    tracing::debug!(status = status.as_u16(), "board request ok");
    Ok(response)
}

/// Read a 2xx response body and decode it against the wire contract.
pub(crate) async fn json_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Reject an empty or whitespace-only credential field at construction.
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BoardError::config(format!("missing {}", field)));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Factory and polymorphic client
// ---------------------------------------------------------------------------

/// A client for one board, speaking one of the three transports.
///
/// Construct through [`create`]; the variant constructors are internal so
/// configuration validation cannot be bypassed.
#[derive(Debug)]
pub enum BoardClient {
    /// Cloud platform API client.
    Subscription(SubscriptionClient),
    /// Cloud read/write API client.
    ReadWrite(RwClient),
    /// LAN device client.
    Local(LocalClient),
}

/// Build a client for `mode` from `config`.
///
/// Validates that the config shape matches the mode and that the shape's
/// required credentials are present, failing with
/// [`BoardError::Config`] before any request could be attempted. Shapes
/// are never coerced between modes.
///
/// # Example
/// ```
/// use vestaboard_client::{create, ClientConfig, Mode, RwConfig};
///
/// let client = create(
///     Mode::Rw,
///     ClientConfig::ReadWrite(RwConfig {
///         api_read_write_key: "rw-key".into(),
///     }),
/// )
/// .unwrap();
/// assert_eq!(client.mode(), Mode::Rw);
/// ```
pub fn create(mode: Mode, config: ClientConfig) -> Result<BoardClient> {
    match (mode, config) {
        (Mode::Subscription, ClientConfig::Subscription(config)) => {
            Ok(BoardClient::Subscription(SubscriptionClient::new(config)?))
        }
        (Mode::Rw, ClientConfig::ReadWrite(config)) => {
            Ok(BoardClient::ReadWrite(RwClient::new(config)?))
        }
        (Mode::Local, ClientConfig::Local(config)) => {
            Ok(BoardClient::Local(LocalClient::new(config)?))
        }
        (mode, config) => Err(BoardError::config(format!(
            "{} mode requires a {}-shaped config, got a {}-shaped one",
            mode,
            mode,
            config.mode()
        ))),
    }
}

impl BoardClient {
    /// Which transport this client speaks.
    pub fn mode(&self) -> Mode {
        match self {
            BoardClient::Subscription(_) => Mode::Subscription,
            BoardClient::ReadWrite(_) => Mode::Rw,
            BoardClient::Local(_) => Mode::Local,
        }
    }

    /// Post a message to the board.
    ///
    /// Text is rendered into tiles server-side on the cloud transports and
    /// client-side (via [`layout::encode`](crate::layout::encode)) on the
    /// Local transport; a [`Grid`] is sent verbatim on all three.
    pub async fn post_message(
        &self,
        message: impl Into<Message>,
        opts: &CallOptions,
    ) -> Result<MessageReceipt> {
        let message = message.into();
        match self {
            BoardClient::Subscription(client) => client.post_message(&message, opts).await,
            BoardClient::ReadWrite(client) => client.post_message(&message, opts).await,
            BoardClient::Local(client) => client.post_message(&message, opts).await,
        }
    }

    /// Read the frame the board is currently showing.
    ///
    /// Supported by the Subscription and Local transports. The ReadWrite
    /// key has no read capability: that variant returns
    /// [`BoardError::Unsupported`] without issuing a request.
    pub async fn read_state(&self, opts: &CallOptions) -> Result<Grid> {
        match self {
            BoardClient::Subscription(client) => client.read_state(opts).await,
            BoardClient::ReadWrite(client) => client.read_state(),
            BoardClient::Local(client) => client.read_state(opts).await,
        }
    }

    /// Set every tile on the board to the code for `token` (a single
    /// character or a reserved special token; unknown input clears the
    /// board to blanks).
    pub async fn clear_to(&self, token: &str, opts: &CallOptions) -> Result<MessageReceipt> {
        let frame = Grid::filled(crate::charset::code_of_token(token));
        self.post_message(frame, opts).await
    }
}
