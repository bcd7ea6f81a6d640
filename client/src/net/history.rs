//! Older-page fetches for the message list.
//!
//! The first call after login loads the newest page; later calls (scroll to
//! top) walk backwards until page 0. `ChatState::begin_history` is the guard:
//! while a fetch is in flight, or once history is exhausted, this is a no-op.

#[cfg(feature = "csr")]
use chatroom::ClientConfig;
#[cfg(feature = "csr")]
use leptos::prelude::*;

#[cfg(feature = "csr")]
use crate::state::chat::ChatState;
#[cfg(feature = "csr")]
use crate::state::notices::NoticeLog;

/// Fetch the next older page, if one is due, and merge it into `chat`.
#[cfg(feature = "csr")]
pub fn load_older(config: ClientConfig, chat: RwSignal<ChatState>, notices: RwSignal<NoticeLog>) {
    let Some((generation, token, page)) = chat.try_update(ChatState::begin_history).flatten() else {
        return;
    };

    leptos::task::spawn_local(async move {
        match crate::net::api::history(&config, page, &token).await {
            Ok(history) => {
                let returned = history.page;
                let count = history.messages.len();
                let applied = chat
                    .try_update(|c| c.apply_history(generation, &token, history))
                    .unwrap_or(false);
                if applied {
                    log::debug!("history page {returned} merged ({count} messages)");
                } else {
                    log::debug!("history page {returned} arrived after the session ended; dropped");
                }
            }
            Err(err) => {
                chat.update(|c| c.fail_history(generation, &token));
                if chat.with_untracked(|c| c.is_current(generation)) {
                    crate::util::alert::report_error(notices, "History failed", &err);
                }
            }
        }
    });
}
