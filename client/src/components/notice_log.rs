//! Visible log of connection notices and publish failures.

#[cfg(test)]
#[path = "notice_log_test.rs"]
mod notice_log_test;

use leptos::prelude::*;

use crate::state::notices::{NoticeLevel, NoticeLog};

fn notice_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "notice",
        NoticeLevel::Error => "notice notice--error",
    }
}

fn notice_count_label(count: usize) -> String {
    if count == 1 { "1 notice".to_owned() } else { format!("{count} notices") }
}

/// Hidden while the log is empty.
#[component]
pub fn NoticeLogView() -> impl IntoView {
    let notices = expect_context::<RwSignal<NoticeLog>>();

    view! {
        <Show when=move || !notices.with(NoticeLog::is_empty)>
            <div class="notice-log">
                <div class="notice-log__header">
                    <span>{move || notice_count_label(notices.with(NoticeLog::len))}</span>
                    <button class="btn notice-log__clear" on:click=move |_| notices.update(NoticeLog::clear)>
                        "Clear"
                    </button>
                </div>
                <For
                    each=move || notices.with(|log| log.entries().cloned().collect::<Vec<_>>())
                    key=|notice| notice.seq
                    let:notice
                >
                    <div class=notice_class(notice.level)>{notice.text}</div>
                </For>
            </div>
        </Show>
    }
}
