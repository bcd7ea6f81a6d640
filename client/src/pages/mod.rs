//! Page modules for the two screens.
//!
//! ARCHITECTURE
//! ============
//! `App` shows `LoginPage` until a login succeeds, then `ChatPage` until the
//! session ends. Pages own orchestration and delegate rendering to
//! `components`.

pub mod chat;
pub mod login;
