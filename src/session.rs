//! Socket session state for one logged-in user.
//!
//! DESIGN
//! ======
//! `ChatSession` is a plain state machine with no I/O. The transport driver
//! (gloo-net in the browser, tokio-tungstenite natively) owns exactly one
//! socket per session and feeds its events in; the session decides what
//! the UI should see and when the socket must be torn down.
//!
//! LIFECYCLE
//! =========
//! 1. Login yields a token → `ChatSession::new` in `Connecting`
//! 2. Socket open → `Connected`
//! 3. WhoAmI frame → identity stored, or `Closing` on a name mismatch
//! 4. Message frames → appended in arrival order
//! 5. Close → messages and identity cleared; token cleared unless the
//!    reconnect policy schedules a redial (`Reconnecting`)

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::time::Duration;

use crate::error::ClientError;
use crate::frame::{FrameError, ServerFrame};
use crate::history::HistoryPager;
use crate::reconnect::ReconnectPolicy;
use crate::types::{HistoryPage, Message, User};

/// Socket connection status as seen by the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// The client is tearing the socket down; inbound frames are dropped.
    Closing,
    /// Closed, waiting out the reconnect delay with the token retained.
    Reconnecting,
}

/// What an inbound socket frame meant for the session.
#[derive(Debug)]
pub enum SessionEvent {
    /// The server confirmed our identity.
    Identity(User),
    /// The server announced another name; the socket must be closed.
    IdentityMismatch { expected: String, actual: String },
    /// A chat message was appended.
    Message(Message),
    /// The frame did not decode and was dropped.
    Discarded(FrameError),
    /// A binary frame was dropped.
    Rejected,
    /// The session is not accepting frames (closing or closed).
    Ignored,
}

/// Result of [`ChatSession::on_close`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloseOutcome {
    pub code: Option<u16>,
    /// Delay before redialing; `None` means the session is over.
    pub reconnect_in: Option<Duration>,
    /// Number of messages discarded with the session state.
    pub cleared_messages: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ChatSession {
    token: Option<String>,
    expected_name: String,
    status: ConnectionStatus,
    identity: Option<User>,
    messages: Vec<Message>,
    history: HistoryPager,
    expecting_own_message: bool,
    reconnect_attempt: u32,
    client_closed: bool,
}

impl ChatSession {
    /// Start a session for a freshly issued token.
    #[must_use]
    pub fn new(token: impl Into<String>, expected_name: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            expected_name: expected_name.into(),
            status: ConnectionStatus::Connecting,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn expected_name(&self) -> &str {
        &self.expected_name
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    #[must_use]
    pub fn identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    /// Messages in display order: loaded history first, then live arrivals.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn history(&self) -> &HistoryPager {
        &self.history
    }

    /// Whether `msg` was sent by the identity the server assigned us.
    #[must_use]
    pub fn is_own(&self, msg: &Message) -> bool {
        self.identity.as_ref().is_some_and(|me| msg.is_from(&me.id))
    }

    /// The socket finished its handshake. Returns `true` when this open
    /// follows a reconnect, so the caller knows to reload the newest history
    /// page that the close discarded.
    pub fn on_open(&mut self) -> bool {
        let resumed = self.reconnect_attempt > 0;
        self.status = ConnectionStatus::Connected;
        self.reconnect_attempt = 0;
        self.client_closed = false;
        resumed
    }

    /// The driver is redialing after a reconnect delay.
    pub fn on_redial(&mut self) {
        if self.status == ConnectionStatus::Reconnecting {
            self.status = ConnectionStatus::Connecting;
        }
    }

    /// Apply an inbound text frame.
    pub fn on_text(&mut self, text: &str) -> SessionEvent {
        if !matches!(self.status, ConnectionStatus::Connecting | ConnectionStatus::Connected) {
            return SessionEvent::Ignored;
        }
        match ServerFrame::decode(text) {
            Ok(ServerFrame::WhoAmI(user)) => {
                if user.name == self.expected_name {
                    self.identity = Some(user.clone());
                    SessionEvent::Identity(user)
                } else {
                    self.begin_close();
                    SessionEvent::IdentityMismatch { expected: self.expected_name.clone(), actual: user.name }
                }
            }
            Ok(ServerFrame::Message(msg)) => {
                self.messages.push(msg.clone());
                SessionEvent::Message(msg)
            }
            Err(err) => SessionEvent::Discarded(err),
        }
    }

    /// Binary frames are not part of the protocol.
    #[must_use]
    pub fn on_binary(&self) -> SessionEvent {
        SessionEvent::Rejected
    }

    /// Mark a close the client initiated itself; it will not reconnect.
    pub fn begin_close(&mut self) {
        self.client_closed = true;
        self.status = ConnectionStatus::Closing;
    }

    /// Apply a socket close and decide whether to redial.
    pub fn on_close(&mut self, code: Option<u16>, policy: &ReconnectPolicy) -> CloseOutcome {
        let attempt = self.reconnect_attempt.saturating_add(1);
        let reconnect_in = if self.token.is_some() {
            policy.delay_for(code, attempt, self.client_closed)
        } else {
            None
        };

        let cleared_messages = self.messages.len();
        self.messages.clear();
        self.identity = None;
        self.history = HistoryPager::new();
        self.expecting_own_message = false;

        if reconnect_in.is_some() {
            self.reconnect_attempt = attempt;
            self.status = ConnectionStatus::Reconnecting;
        } else {
            self.token = None;
            self.reconnect_attempt = 0;
            self.status = ConnectionStatus::Disconnected;
        }
        CloseOutcome { code, reconnect_in, cleared_messages }
    }

    /// Validate an outgoing body and return the text to put on the wire.
    ///
    /// # Errors
    ///
    /// [`ClientError::EmptyMessage`] for an empty body, [`ClientError::SendOnClosed`]
    /// when the socket is not open. Whitespace is sent as typed.
    pub fn compose(&mut self, body: &str) -> Result<String, ClientError> {
        if body.is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        if !self.is_connected() {
            return Err(ClientError::SendOnClosed);
        }
        self.expecting_own_message = true;
        Ok(body.to_owned())
    }

    /// True exactly once for the first own message after a submission.
    pub fn take_scroll_request(&mut self, msg: &Message) -> bool {
        if self.expecting_own_message && self.is_own(msg) {
            self.expecting_own_message = false;
            return true;
        }
        false
    }

    /// Claim the next history fetch: `(token, page)`.
    pub fn begin_history(&mut self) -> Option<(String, i64)> {
        let token = self.token.clone()?;
        let page = self.history.begin()?;
        Some((token, page))
    }

    /// Prepend an older page fetched with `token`.
    ///
    /// Returns `false` (and changes nothing) when the session has since been
    /// closed or re-established with a different token.
    pub fn apply_history(&mut self, token: &str, page: HistoryPage) -> bool {
        if self.token.as_deref() != Some(token) {
            return false;
        }
        self.history.complete(page.page);
        let mut merged: Vec<Message> = page
            .messages
            .into_iter()
            .filter(|older| !self.messages.contains(older))
            .collect();
        merged.append(&mut self.messages);
        self.messages = merged;
        true
    }

    /// Release the history guard after a failed fetch made with `token`.
    pub fn fail_history(&mut self, token: &str) {
        if self.token.as_deref() == Some(token) {
            self.history.fail();
        }
    }

    /// Drop all local state; returns the token for the server-side logout.
    pub fn logout(&mut self) -> Option<String> {
        let token = self.token.take();
        self.messages.clear();
        self.identity = None;
        self.history = HistoryPager::new();
        self.expecting_own_message = false;
        self.reconnect_attempt = 0;
        self.client_closed = true;
        self.status = ConnectionStatus::Disconnected;
        token
    }
}
