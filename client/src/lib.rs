//! Browser chat client.
//!
//! ARCHITECTURE
//! ============
//! - `state`: signal-backed containers (`AuthState`, `ChatState`, `NoticeLog`)
//! - `net`: REST calls, history paging, and the WebSocket session task
//! - `pages` / `components`: Leptos views
//!
//! Built for the browser with `--features csr`; without it the crate compiles
//! natively so the pure helpers can be unit tested.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        leptos::logging::warn!("console logger already installed");
    }
    log::info!("chat client starting");
    leptos::mount::mount_to_body(app::App);
}
