//! Networking: REST calls, history paging, and the chat socket.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` wraps the login/logout/history endpoints with `gloo-net`, `history`
//! drives page fetches into `ChatState`, and `socket` owns the WebSocket task
//! for one login.

pub mod api;
pub mod history;
pub mod socket;
