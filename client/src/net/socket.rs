//! Browser WebSocket session task.
//!
//! One task per login. It dials `join_url(token)`, waits for the socket to
//! reach OPEN before marking the session active, feeds every text frame
//! into `ChatState`, forwards `SocketCommand`s from the UI, and applies the
//! configured reconnect policy when the socket closes. The UI holds a
//! `SocketSender` in context instead of the socket itself.
//!
//! All WebSocket logic is gated behind `#[cfg(feature = "csr")]` since it
//! requires a browser environment.
//!
//! ERROR HANDLING
//! ==============
//! Undecodable and binary frames are logged and dropped; the socket stays
//! open. An identity mismatch closes the socket and ends the session. Send
//! failures become "Publish failed" notices.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

#[cfg(any(test, feature = "csr"))]
use std::time::Duration;

#[cfg(any(test, feature = "csr"))]
use chatroom::SessionEvent;
#[cfg(feature = "csr")]
use chatroom::ClientConfig;
#[cfg(feature = "csr")]
use leptos::prelude::*;

#[cfg(any(test, feature = "csr"))]
use crate::state::notices::NoticeLevel;
#[cfg(feature = "csr")]
use crate::state::auth::AuthState;
#[cfg(any(test, feature = "csr"))]
use crate::state::chat::ChatState;
#[cfg(feature = "csr")]
use crate::state::notices::NoticeLog;

/// Browsers only accept 1000 or 3000-4999 as a script-initiated close code.
#[cfg(feature = "csr")]
const CLIENT_CLOSE_CODE: u16 = 1000;

/// How often the opening socket's ready state is checked.
#[cfg(feature = "csr")]
const OPEN_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SocketCommand {
    /// A composed body, forwarded verbatim as a text frame.
    Send(String),
    Close,
}

/// UI-side handle to the running socket task.
#[derive(Clone, Debug, Default)]
pub struct SocketSender {
    #[cfg(feature = "csr")]
    tx: Option<futures::channel::mpsc::UnboundedSender<SocketCommand>>,
}

impl SocketSender {
    /// Queue `command`. Returns `false` if no session task is running.
    #[cfg_attr(not(feature = "csr"), allow(unused_variables, clippy::unused_self))]
    pub fn send(&self, command: SocketCommand) -> bool {
        #[cfg(feature = "csr")]
        {
            self.tx.as_ref().is_some_and(|tx| tx.unbounded_send(command).is_ok())
        }
        #[cfg(not(feature = "csr"))]
        {
            false
        }
    }
}

/// Browser `WebSocket.readyState`, folded to what the handshake cares about.
#[cfg(any(test, feature = "csr"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReadyState {
    Connecting,
    Open,
    /// CLOSING or CLOSED: the handshake will not complete.
    Closed,
}

#[cfg(any(test, feature = "csr"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Handshake {
    /// Still connecting; check again later.
    Pending,
    /// The session is active. `resumed` is set after a reconnect.
    Opened { resumed: bool },
    /// The socket closed before it opened (refused, bad URL, server down).
    Failed,
    /// A newer login or a logout replaced this session.
    Stale,
}

/// Advance the handshake for `generation` given the socket's ready state.
/// The session is only marked active once the socket is actually OPEN.
#[cfg(any(test, feature = "csr"))]
fn handshake_step(chat: &mut ChatState, generation: u64, ready: ReadyState) -> Handshake {
    if !chat.is_current(generation) {
        return Handshake::Stale;
    }
    match ready {
        ReadyState::Connecting => Handshake::Pending,
        ReadyState::Open => match chat.opened(generation) {
            Some(resumed) => Handshake::Opened { resumed },
            None => Handshake::Stale,
        },
        ReadyState::Closed => Handshake::Failed,
    }
}

#[cfg(any(test, feature = "csr"))]
fn close_notice(code: Option<u16>, reconnect_in: Option<Duration>) -> String {
    let closed = match code {
        Some(code) => format!("Disconnected (code {code})"),
        None => "Disconnected".to_owned(),
    };
    match reconnect_in {
        Some(delay) => format!("{closed}; reconnecting in {}ms", delay.as_millis()),
        None => closed,
    }
}

/// Notice to record for a session event, if it deserves one.
#[cfg(any(test, feature = "csr"))]
fn event_notice(event: &SessionEvent) -> Option<(NoticeLevel, String)> {
    match event {
        SessionEvent::Identity(user) => Some((NoticeLevel::Info, format!("Joined as {}", user.name))),
        SessionEvent::IdentityMismatch { expected, actual } => Some((
            NoticeLevel::Error,
            format!("Server identified this session as {actual}, expected {expected}; disconnecting"),
        )),
        SessionEvent::Discarded(err) => Some((NoticeLevel::Error, format!("Dropped frame: {err}"))),
        SessionEvent::Rejected => Some((NoticeLevel::Error, "Dropped binary frame".to_owned())),
        SessionEvent::Message(_) | SessionEvent::Ignored => None,
    }
}

/// Start the socket task for a fresh login and return its sender.
#[cfg(feature = "csr")]
pub fn spawn_session(
    config: ClientConfig,
    token: String,
    user: String,
    chat: RwSignal<ChatState>,
    auth: RwSignal<AuthState>,
    notices: RwSignal<NoticeLog>,
) -> SocketSender {
    let (tx, rx) = futures::channel::mpsc::unbounded::<SocketCommand>();
    let generation = chat.try_update(|c| c.start(token, user)).unwrap_or_default();
    leptos::task::spawn_local(session_loop(config, generation, chat, auth, notices, rx));
    SocketSender { tx: Some(tx) }
}

/// Dial, run, and redial per the reconnect policy until the session ends.
#[cfg(feature = "csr")]
async fn session_loop(
    config: ClientConfig,
    generation: u64,
    chat: RwSignal<ChatState>,
    auth: RwSignal<AuthState>,
    notices: RwSignal<NoticeLog>,
    mut rx: futures::channel::mpsc::UnboundedReceiver<SocketCommand>,
) {
    loop {
        let Some((token, user)) = chat.with_untracked(|c| c.dial_target(generation)) else {
            break;
        };

        let dialed = config
            .join_url(&token, &user)
            .map_err(|e| e.to_string())
            .and_then(|url| gloo_net::websocket::futures::WebSocket::open(&url).map_err(|e| e.to_string()));
        let code = match dialed {
            Ok(ws) => match wait_for_open(&ws, generation, chat, notices, &mut rx).await {
                Some(Handshake::Opened { resumed }) => {
                    leptos::logging::log!("WS connected as {user}");
                    if resumed {
                        // The close emptied the list; start again from the newest page.
                        crate::net::history::load_older(config.clone(), chat, notices);
                    }
                    run_socket(ws, generation, chat, notices, &mut rx).await
                }
                Some(Handshake::Failed) => {
                    leptos::logging::warn!("WS closed before opening");
                    notices.update(|n| n.error("Connection failed: socket closed before opening"));
                    None
                }
                Some(Handshake::Pending | Handshake::Stale) => break,
                None => {
                    chat.update(|c| c.begin_close(generation));
                    close_ws(ws)
                }
            },
            Err(err) => {
                leptos::logging::warn!("WS dial failed: {err}");
                notices.update(|n| n.error(format!("Connection failed: {err}")));
                None
            }
        };

        let Some(outcome) = chat
            .try_update(|c| c.closed(generation, code, &config.reconnect))
            .flatten()
        else {
            break;
        };
        leptos::logging::log!("WS closed: {code:?}, cleared {} messages", outcome.cleared_messages);
        notices.update(|n| n.info(close_notice(outcome.code, outcome.reconnect_in)));

        let Some(delay) = outcome.reconnect_in else {
            auth.update(AuthState::sign_out);
            break;
        };
        if !wait_for_redial(delay, &mut rx, notices).await {
            break;
        }
        if !chat.try_update(|c| c.redial(generation)).unwrap_or(false) {
            break;
        }
    }
}

/// Process one connection until it closes; returns the close code, if any.
#[cfg(feature = "csr")]
async fn run_socket(
    ws: gloo_net::websocket::futures::WebSocket,
    generation: u64,
    chat: RwSignal<ChatState>,
    notices: RwSignal<NoticeLog>,
    rx: &mut futures::channel::mpsc::UnboundedReceiver<SocketCommand>,
) -> Option<u16> {
    use futures::future::{Either, select};
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::{Message, WebSocketError};

    enum Step<C, F> {
        Command(C),
        Frame(F),
    }

    let (mut write, mut read) = ws.split();
    loop {
        let step = match select(rx.next(), read.next()).await {
            Either::Left((command, _)) => Step::Command(command),
            Either::Right((frame, _)) => Step::Frame(frame),
        };

        match step {
            Step::Command(Some(SocketCommand::Send(text))) => {
                if let Err(err) = write.send(Message::Text(text)).await {
                    leptos::logging::warn!("WS send failed: {err}");
                    notices.update(|n| n.publish_failed(&err.to_string()));
                }
            }
            Step::Command(Some(SocketCommand::Close) | None) => {
                chat.update(|c| c.begin_close(generation));
                return close_socket(write, read);
            }
            Step::Frame(Some(Ok(Message::Text(text)))) => {
                let Some(event) = chat.try_update(|c| c.receive(generation, &text)).flatten() else {
                    return close_socket(write, read);
                };
                if let Some((level, notice)) = event_notice(&event) {
                    leptos::logging::log!("WS: {notice}");
                    notices.update(|n| n.push(level, notice));
                }
                if matches!(event, SessionEvent::IdentityMismatch { .. }) {
                    return close_socket(write, read);
                }
            }
            Step::Frame(Some(Ok(Message::Bytes(bytes)))) => {
                leptos::logging::warn!("WS binary frame ({} bytes) dropped", bytes.len());
                notices.update(|n| n.error("Dropped binary frame"));
            }
            Step::Frame(Some(Err(WebSocketError::ConnectionClose(event)))) => return Some(event.code),
            Step::Frame(Some(Err(err))) => {
                leptos::logging::warn!("WS recv error: {err}");
                return None;
            }
            Step::Frame(None) => return None,
        }
    }
}

/// Wait until the socket leaves CONNECTING. `None` if the UI closed the
/// session first; the caller still owns the socket and must close it.
#[cfg(feature = "csr")]
async fn wait_for_open(
    ws: &gloo_net::websocket::futures::WebSocket,
    generation: u64,
    chat: RwSignal<ChatState>,
    notices: RwSignal<NoticeLog>,
    rx: &mut futures::channel::mpsc::UnboundedReceiver<SocketCommand>,
) -> Option<Handshake> {
    use futures::StreamExt;
    use futures::future::{Either, select};
    use gloo_net::websocket::State;

    loop {
        let ready = match ws.state() {
            State::Connecting => ReadyState::Connecting,
            State::Open => ReadyState::Open,
            State::Closing | State::Closed => ReadyState::Closed,
        };
        let step = chat
            .try_update(|c| handshake_step(c, generation, ready))
            .unwrap_or(Handshake::Stale);
        if step != Handshake::Pending {
            return Some(step);
        }

        let poll = gloo_timers::future::sleep(OPEN_POLL_INTERVAL);
        match select(Box::pin(poll), rx.next()).await {
            Either::Left(((), _)) => {}
            Either::Right((Some(SocketCommand::Send(_)), _)) => {
                notices.update(|n| n.publish_failed("socket is still connecting"));
            }
            Either::Right((Some(SocketCommand::Close) | None, _)) => return None,
        }
    }
}

#[cfg(feature = "csr")]
fn close_socket(
    write: futures::stream::SplitSink<gloo_net::websocket::futures::WebSocket, gloo_net::websocket::Message>,
    read: futures::stream::SplitStream<gloo_net::websocket::futures::WebSocket>,
) -> Option<u16> {
    match write.reunite(read) {
        Ok(ws) => close_ws(ws),
        Err(err) => {
            leptos::logging::warn!("WS reunite failed: {err}");
            Some(CLIENT_CLOSE_CODE)
        }
    }
}

#[cfg(feature = "csr")]
fn close_ws(ws: gloo_net::websocket::futures::WebSocket) -> Option<u16> {
    if let Err(err) = ws.close(Some(CLIENT_CLOSE_CODE), None) {
        leptos::logging::warn!("WS close failed: {err}");
    }
    Some(CLIENT_CLOSE_CODE)
}

/// Sleep out the reconnect delay. Returns `false` if the UI closed the session.
#[cfg(feature = "csr")]
async fn wait_for_redial(
    delay: Duration,
    rx: &mut futures::channel::mpsc::UnboundedReceiver<SocketCommand>,
    notices: RwSignal<NoticeLog>,
) -> bool {
    use futures::StreamExt;
    use futures::future::{Either, select};

    let mut sleep = Box::pin(gloo_timers::future::sleep(delay));
    loop {
        match select(sleep.as_mut(), rx.next()).await {
            Either::Left(((), _)) => return true,
            Either::Right((Some(SocketCommand::Send(_)), _)) => {
                notices.update(|n| n.publish_failed("socket is reconnecting"));
            }
            Either::Right((Some(SocketCommand::Close) | None, _)) => return false,
        }
    }
}
