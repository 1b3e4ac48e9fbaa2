//! # Vestaboard Client Library
//!
//! Client for Vestaboard split-flap displays: a text-to-grid codec that
//! turns human-readable text into the fixed 6×22 character-code matrix the
//! hardware renders, and a transport client that delivers a frame (or
//! equivalent text) through one of three authentication/endpoint schemes.
//!
//! ## Design
//!
//! ### Total encoding
//! The codec never fails. Unknown characters degrade to blank tiles,
//! overflow past the board's 132 cells is silently truncated, and the
//! output is always a complete frame. A corrupted character must not
//! abort rendering of the rest of a message.
//!
//! ### Closed transport set
//! [`BoardClient`] is an enum over exactly three variants —
//! Subscription, ReadWrite, Local — each holding its own credential
//! shape. [`create`] is the only public constructor and validates the
//! mode/config pairing exhaustively, so a mis-shaped config fails with a
//! [`BoardError::Config`] before any request is attempted.
//!
//! ### Retry-free by design
//! Failed requests are returned as typed errors, never retried
//! internally. Callers compose their own backoff or fallback-message
//! policy on top; the distinct [`BoardError::Cancelled`] and
//! [`BoardError::Unsupported`] variants keep that policy code honest.
//!
//! ## Example
//!
//! ```no_run
//! use vestaboard_client::{create, CallOptions, ClientConfig, Mode, RwConfig};
//!
//! # async fn run() -> Result<(), vestaboard_client::BoardError> {
//! let client = create(
//!     Mode::Rw,
//!     ClientConfig::ReadWrite(RwConfig {
//!         api_read_write_key: std::env::var("RW_API_KEY").unwrap(),
//!     }),
//! )?;
//!
//! client
//!     .post_message("HIGH 3:45 PM 4.2 FT", &CallOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Pre-built frames skip server-side rendering entirely:
//!
//! ```
//! use vestaboard_client::layout::{encode, to_text};
//!
//! let frame = encode("72 degreeSign return SUNNY");
//! assert_eq!(frame.rows().len(), 6);
//! println!("{}", to_text(&frame));
//! ```

pub mod charset;
pub mod config;
pub mod error;
pub mod layout;
pub mod local;
pub mod rw;
pub mod subscription;
pub mod transport;

pub use charset::CharacterCode;
pub use config::Config;
pub use error::{BoardError, Result};
pub use layout::{Grid, Line, CELLS, COLUMNS, ROWS};
pub use local::LocalClient;
pub use rw::RwClient;
pub use subscription::{Subscription, SubscriptionClient, Viewer};
pub use transport::{
    create, BoardClient, CallOptions, CancelHandle, CancelToken, ClientConfig, LocalConfig,
    Message, MessageReceipt, Mode, RwConfig, SubscriptionConfig,
};
