//! Reusable UI components for the chat page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read and write shared state from Leptos context providers set
//! up by `App`; none of them own protocol state.

pub mod message_input;
pub mod message_list;
pub mod notice_log;
