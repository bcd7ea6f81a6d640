//! # chatroom
//!
//! Client-side core for the chatroom service: wire types, socket frame
//! decoding, the per-login socket session state machine, history paging,
//! reconnect policy, and endpoint configuration.
//!
//! The core is UI-free and transport-free so the Leptos browser client
//! (`client/`) and the terminal client (`cli/`) share one set of rules.
//! The `native` feature (on by default) adds the reqwest HTTP client and the
//! tokio-tungstenite socket driver used outside the browser.
//!
//! SYSTEM CONTEXT
//! ==============
//! The chat server is external. It exposes `POST /login`, `GET /logout`,
//! `GET /history?page=<n>` and a `GET /join?token=<t>` WebSocket that pushes
//! identity assignments and chat messages as JSON text frames.

pub mod config;
pub mod error;
pub mod frame;
pub mod history;
pub mod reconnect;
pub mod session;
pub mod types;

#[cfg(feature = "native")]
pub mod http;
#[cfg(feature = "native")]
pub mod socket;

pub use config::ClientConfig;
pub use error::{ClientError, HttpError};
pub use frame::{FrameError, ServerFrame};
pub use history::{HistoryCursor, HistoryPager};
pub use reconnect::ReconnectPolicy;
pub use session::{ChatSession, ConnectionStatus, SessionEvent};
pub use types::{HistoryPage, Message, User};
