//! Username + password login page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

#[cfg(feature = "csr")]
use chatroom::ClientConfig;
use leptos::prelude::*;

#[cfg(feature = "csr")]
use crate::net::socket::SocketSender;
use crate::state::auth::AuthState;
#[cfg(feature = "csr")]
use crate::state::chat::ChatState;
#[cfg(feature = "csr")]
use crate::state::notices::NoticeLog;

/// Trimmed user name and raw password, or `None` if either is blank.
fn validate_login_input(user: &str, password: &str) -> Option<(String, String)> {
    let user = user.trim();
    if user.is_empty() || password.is_empty() {
        return None;
    }
    Some((user.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    #[cfg(feature = "csr")]
    let chat = expect_context::<RwSignal<ChatState>>();
    #[cfg(feature = "csr")]
    let notices = expect_context::<RwSignal<NoticeLog>>();
    #[cfg(feature = "csr")]
    let sender = expect_context::<StoredValue<SocketSender>>();
    #[cfg(feature = "csr")]
    let config = expect_context::<ClientConfig>();

    let user = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.with_untracked(|a| a.busy) {
            return;
        }
        #[cfg_attr(not(feature = "csr"), allow(unused_variables))]
        let Some((name, secret)) = validate_login_input(&user.get_untracked(), &password.get_untracked()) else {
            return;
        };
        auth.update(|a| a.busy = true);

        #[cfg(feature = "csr")]
        {
            let config = config.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::login(&config, &name, &secret).await {
                    Ok(token) => {
                        log::info!("login succeeded for {name}");
                        password.set(String::new());
                        let tx = crate::net::socket::spawn_session(config, token, name.clone(), chat, auth, notices);
                        sender.set_value(tx);
                        auth.update(|a| a.sign_in(name));
                    }
                    Err(err) => {
                        auth.update(|a| a.busy = false);
                        crate::util::alert::report_error(notices, "Login failed", &err);
                    }
                }
            });
        }
    };

    let busy = move || auth.with(|a| a.busy);
    let can_submit = move || !busy() && validate_login_input(&user.get(), &password.get()).is_some();

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Chat"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        autocomplete="username"
                        prop:value=move || user.get()
                        on:input=move |ev| user.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || !can_submit()>
                        {move || if busy() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
