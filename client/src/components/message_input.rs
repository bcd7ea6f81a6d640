//! Outgoing message box.
//!
//! Enter or the send button composes through `ChatSession::compose` and
//! hands the body to the socket task. Empty input never sends; any other
//! failure lands in the notice log as "Publish failed: ...".

#[cfg(test)]
#[path = "message_input_test.rs"]
mod message_input_test;

use chatroom::ClientError;
use leptos::prelude::*;

use crate::net::socket::{SocketCommand, SocketSender};
use crate::state::chat::ChatState;
use crate::state::notices::NoticeLog;

/// Reason to record for a failed compose, or `None` when the input was
/// simply empty.
fn failure_reason(err: &ClientError) -> Option<String> {
    match err {
        ClientError::EmptyMessage => None,
        other => Some(other.to_string()),
    }
}

#[component]
pub fn MessageInput() -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    let notices = expect_context::<RwSignal<NoticeLog>>();
    let sender = expect_context::<StoredValue<SocketSender>>();

    let input = RwSignal::new(String::new());

    let do_send = move || {
        let text = input.get_untracked();
        let Some(composed) = chat.try_update(|c| c.session.compose(&text)) else {
            return;
        };
        match composed {
            Ok(body) => {
                if sender.with_value(|s| s.send(SocketCommand::Send(body))) {
                    input.set(String::new());
                } else {
                    notices.update(|n| n.publish_failed(&ClientError::SendOnClosed.to_string()));
                }
            }
            Err(err) => {
                if let Some(reason) = failure_reason(&err) {
                    leptos::logging::warn!("publish failed: {reason}");
                    notices.update(|n| n.publish_failed(&reason));
                }
            }
        }
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            do_send();
        }
    };

    let connected = move || chat.with(|c| c.session.is_connected());
    let can_send = move || connected() && !input.get().is_empty();

    view! {
        <div class="message-input">
            <input
                class="message-input__field"
                type="text"
                placeholder=move || if connected() { "Say something..." } else { "Not connected" }
                prop:value=move || input.get()
                on:input=move |ev| input.set(event_target_value(&ev))
                on:keydown=on_keydown
            />
            <button class="btn btn--primary message-input__send" on:click=move |_| do_send() disabled=move || !can_send()>
                "Send"
            </button>
        </div>
    }
}
