//! Chat page: header with logout, message list, and input.
//!
//! LIFECYCLE
//! =========
//! 1. Mount → load the newest history page
//! 2. Socket frames stream into `ChatState` via the session task
//! 3. Logout → close the socket, drop local state, `GET /logout`

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

#[cfg(feature = "csr")]
use chatroom::ClientConfig;
use chatroom::ConnectionStatus;
use leptos::prelude::*;

use crate::components::message_input::MessageInput;
use crate::components::message_list::MessageList;
use crate::net::socket::{SocketCommand, SocketSender};
use crate::state::auth::AuthState;
use crate::state::chat::ChatState;
use crate::state::notices::NoticeLog;

fn status_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Disconnected => "Offline",
        ConnectionStatus::Connecting => "Connecting",
        ConnectionStatus::Connected => "Online",
        ConnectionStatus::Closing => "Closing",
        ConnectionStatus::Reconnecting => "Reconnecting",
    }
}

#[component]
pub fn ChatPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let chat = expect_context::<RwSignal<ChatState>>();
    let notices = expect_context::<RwSignal<NoticeLog>>();
    let sender = expect_context::<StoredValue<SocketSender>>();
    #[cfg(feature = "csr")]
    let config = expect_context::<ClientConfig>();

    #[cfg(feature = "csr")]
    crate::net::history::load_older(config.clone(), chat, notices);

    let on_logout = move |_| {
        if !sender.with_value(|s| s.send(SocketCommand::Close)) {
            leptos::logging::log!("logout with no socket task running");
        }
        sender.set_value(SocketSender::default());
        #[cfg_attr(not(feature = "csr"), allow(unused_variables))]
        let token = chat.try_update(ChatState::stop).flatten();
        auth.update(AuthState::sign_out);
        notices.update(|n| n.info("Logged out"));

        #[cfg(feature = "csr")]
        {
            if let Some(token) = token {
                let config = config.clone();
                leptos::task::spawn_local(async move {
                    if let Err(err) = crate::net::api::logout(&config, &token).await {
                        crate::util::alert::report_error(notices, "Logout failed", &err);
                    }
                });
            }
        }
    };

    let user_name = move || auth.with(|a| a.user.clone().unwrap_or_default());
    let status = move || chat.with(|c| c.session.status());

    view! {
        <div class="chat-page">
            <header class="chat-header">
                <span class="chat-header__user">{user_name}</span>
                <span class="chat-header__status" class:chat-header__status--online=move || status() == ConnectionStatus::Connected>
                    {move || status_label(status())}
                </span>
                <button class="btn chat-header__logout" on:click=on_logout>
                    "Log out"
                </button>
            </header>
            <MessageList/>
            <MessageInput/>
        </div>
    }
}
