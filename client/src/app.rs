//! Root component and context wiring.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provides `RwSignal<AuthState>`, `RwSignal<ChatState>`, `RwSignal<NoticeLog>`,
//! `StoredValue<SocketSender>`, and the `ClientConfig` to every page. The
//! socket itself is never shared; handlers talk to it through the sender.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use chatroom::ClientConfig;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::components::notice_log::NoticeLogView;
use crate::net::socket::SocketSender;
use crate::pages::chat::ChatPage;
use crate::pages::login::LoginPage;
use crate::state::auth::AuthState;
use crate::state::chat::ChatState;
use crate::state::notices::NoticeLog;

/// Config for the server that served this page.
fn config_for_origin(origin: Option<&str>) -> ClientConfig {
    match origin.map(ClientConfig::for_base_url) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            leptos::logging::warn!("{err}; using default server");
            ClientConfig::default()
        }
        None => ClientConfig::default(),
    }
}

fn browser_config() -> ClientConfig {
    #[cfg(feature = "csr")]
    {
        let origin = web_sys::window().and_then(|w| w.location().origin().ok());
        config_for_origin(origin.as_deref())
    }
    #[cfg(not(feature = "csr"))]
    {
        config_for_origin(None)
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    provide_context(auth);
    provide_context(RwSignal::new(ChatState::default()));
    provide_context(RwSignal::new(NoticeLog::default()));
    provide_context(StoredValue::new(SocketSender::default()));
    provide_context(browser_config());

    view! {
        <Title text="Chat"/>
        <main class="app">
            <Show when=move || auth.with(AuthState::is_signed_in) fallback=|| view! { <LoginPage/> }>
                <ChatPage/>
            </Show>
            <NoticeLogView/>
        </main>
    }
}
