//! Shared UI state containers.
//!
//! DESIGN
//! ======
//! Each container is a plain struct wrapped in an `RwSignal` and provided via
//! context by `App`. Protocol rules live in `chatroom::ChatSession`; these
//! types only add what the browser needs on top (generations, scroll
//! requests, the visible notice log).

pub mod auth;
pub mod chat;
pub mod notices;
