//! Scrollable message list with scroll-to-top pagination.
//!
//! Own messages are aligned right; others show the sender's name. Reaching
//! the top edge requests the next older history page. After an older page
//! is prepended the viewport is shifted by the added height so the reader
//! keeps their place; the first (newest) page lands at the bottom.

#[cfg(test)]
#[path = "message_list_test.rs"]
mod message_list_test;

#[cfg(feature = "csr")]
use chatroom::ClientConfig;
use leptos::prelude::*;

use crate::state::chat::ChatState;
#[cfg(feature = "csr")]
use crate::state::notices::NoticeLog;

fn row_class(own: bool) -> &'static str {
    if own { "message message--own" } else { "message" }
}

/// Whether a scroll position should trigger an older-page fetch.
fn should_fetch_older(scroll_top: i32, loading: bool, exhausted: bool) -> bool {
    scroll_top <= 0 && !loading && !exhausted
}

/// Scroll offset that keeps the same content in view after the list grew
/// from `previous_height` to `new_height` above the viewport.
fn preserved_scroll_top(previous_height: i32, new_height: i32, previous_top: i32) -> i32 {
    (new_height - previous_height + previous_top).max(0)
}

#[component]
pub fn MessageList() -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    #[cfg(feature = "csr")]
    let notices = expect_context::<RwSignal<NoticeLog>>();
    #[cfg(feature = "csr")]
    let config = expect_context::<ClientConfig>();

    let list_ref = NodeRef::<leptos::html::Div>::new();
    // (scroll_height, scroll_top) captured right before an older-page fetch.
    #[cfg(feature = "csr")]
    let anchor = StoredValue::new(None::<(i32, i32)>);

    // Jump to the newest entry after our own submission comes back.
    Effect::new(move || {
        if chat.with(ChatState::scroll_seq) == 0 {
            return;
        }
        #[cfg(feature = "csr")]
        {
            if let Some(el) = list_ref.get() {
                el.set_scroll_top(el.scroll_height());
            }
        }
    });

    Effect::new(move || {
        if chat.with(ChatState::history_seq) == 0 {
            return;
        }
        #[cfg(feature = "csr")]
        {
            if let Some(el) = list_ref.get() {
                let top = match anchor.get_value() {
                    Some((height, top)) => preserved_scroll_top(height, el.scroll_height(), top),
                    None => el.scroll_height(),
                };
                el.set_scroll_top(top);
                anchor.set_value(None);
            }
        }
    });

    let on_scroll = move |_| {
        #[cfg(feature = "csr")]
        {
            let Some(el) = list_ref.get_untracked() else {
                return;
            };
            let (loading, exhausted) = chat.with_untracked(|c| {
                let history = c.session.history();
                (history.is_loading(), history.is_exhausted())
            });
            if should_fetch_older(el.scroll_top(), loading, exhausted) {
                anchor.set_value(Some((el.scroll_height(), el.scroll_top())));
                crate::net::history::load_older(config.clone(), chat, notices);
            }
        }
    };

    view! {
        <div class="message-list" node_ref=list_ref on:scroll=on_scroll>
            {move || {
                chat.with(|c| c.session.history().is_loading())
                    .then(|| view! { <div class="message-list__loading">"Loading older messages..."</div> })
            }}
            {move || {
                chat.with(|c| {
                    let messages = c.session.messages();
                    if messages.is_empty() {
                        return view! { <div class="message-list__empty">"No messages yet"</div> }.into_any();
                    }
                    messages
                        .iter()
                        .map(|msg| {
                            let own = c.session.is_own(msg);
                            let sender = (!own).then(|| msg.user.name.clone());
                            let time = msg.time_label();
                            let body = msg.body.clone();
                            view! {
                                <div class=row_class(own)>
                                    {sender.map(|name| view! { <span class="message__sender">{name}</span> })}
                                    <span class="message__time">{time}</span>
                                    <span class="message__body">{body}</span>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                })
            }}
        </div>
    }
}
