//! Blocking error reports.
//!
//! HTTP failures (login, logout, history) interrupt the user with a
//! `window.alert` and are also kept in the notice log, where they stay
//! visible after the dialog is dismissed.

#[cfg(test)]
#[path = "alert_test.rs"]
mod alert_test;

use chatroom::ClientError;
use leptos::prelude::*;

use crate::state::notices::NoticeLog;

fn report_text(context: &str, err: &ClientError) -> String {
    format!("{context}: {err}")
}

/// Show `err` in a blocking alert and append it to the notice log.
pub fn report_error(notices: RwSignal<NoticeLog>, context: &str, err: &ClientError) {
    let text = report_text(context, err);
    leptos::logging::warn!("{text}");
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.alert_with_message(&text) {
                leptos::logging::warn!("alert failed: {e:?}");
            }
        }
    }
    notices.update(|n| n.error(text));
}
