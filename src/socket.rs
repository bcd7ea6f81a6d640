//! Native socket session driver (tokio-tungstenite).
//!
//! DESIGN
//! ======
//! [`connect`] spawns one task that owns both the WebSocket and the
//! [`ChatSession`]. Callers talk to it through a [`SessionHandle`]: commands
//! go in over an unbounded channel, [`SessionUpdate`]s come out over another,
//! and the connection status is published on a `watch` channel so `send`
//! can fail fast without a round trip.
//!
//! LIFECYCLE
//! =========
//! 1. Dial `join_url(token)` → `Connected`
//! 2. Select over inbound frames and outbound commands until the socket closes
//! 3. Close → consult the reconnect policy; sleep and redial, or finish
//!
//! A client-initiated close waits at most [`CLOSE_ACK_TIMEOUT`] for the
//! server's close reply, then drops the stream.

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::reconnect::CLOSE_GOING_AWAY;
use crate::session::{ChatSession, ConnectionStatus, SessionEvent};
use crate::types::{Message, User};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, WsMessage>;
type WsRead = SplitStream<WsStream>;

/// How long a client-initiated close waits for the server to echo the close frame.
pub const CLOSE_ACK_TIMEOUT: Duration = Duration::from_secs(2);

/// Something the UI should react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    Connected,
    /// Connected again after a reconnect. The close discarded the message
    /// list, so the newest history page should be reloaded.
    Resumed,
    Identity(User),
    /// `scroll` is set for the first own message after a send.
    Message { message: Message, scroll: bool },
    /// An inbound frame was dropped; the text is for the log.
    Discarded(String),
    Rejected,
    IdentityMismatch { expected: String, actual: String },
    /// A queued send failed after passing the status check.
    SendFailed(String),
    /// The dial itself failed.
    DialFailed(String),
    Closed { code: Option<u16>, reconnect_in: Option<Duration> },
}

#[derive(Debug)]
enum Command {
    Send(String),
    Close,
}

/// Caller side of a running socket session.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    updates: mpsc::UnboundedReceiver<SessionUpdate>,
    status: watch::Receiver<ConnectionStatus>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Forward `body` verbatim as a text frame.
    ///
    /// # Errors
    ///
    /// [`ClientError::EmptyMessage`] for an empty body and
    /// [`ClientError::SendOnClosed`] when the socket is not open. Nothing is
    /// queued or retried in either case.
    pub fn send(&self, body: &str) -> Result<(), ClientError> {
        if body.is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        if self.status() != ConnectionStatus::Connected {
            return Err(ClientError::SendOnClosed);
        }
        self.commands
            .send(Command::Send(body.to_owned()))
            .map_err(|_| ClientError::SendOnClosed)
    }

    /// Close the socket from the client side (code 1001). Never reconnects.
    pub fn close(&self) {
        if self.commands.send(Command::Close).is_err() {
            debug!("close requested after session task ended");
        }
    }

    /// Next update, or `None` once the session task has finished.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        self.updates.recv().await
    }

    /// Wait for the session task to finish.
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            warn!(error = %err, "socket session task failed");
        }
    }
}

/// Open the session socket for `token` on the current tokio runtime.
#[must_use]
pub fn connect(config: &ClientConfig, token: &str, user: &str) -> SessionHandle {
    let (commands, command_rx) = mpsc::unbounded_channel();
    let (update_tx, updates) = mpsc::unbounded_channel();
    let (status_tx, status) = watch::channel(ConnectionStatus::Connecting);

    let session = ChatSession::new(token, user);
    let driver = Driver { config: config.clone(), session, commands: command_rx, updates: update_tx, status: status_tx };
    let task = tokio::spawn(driver.run());

    SessionHandle { commands, updates, status, task }
}

struct Driver {
    config: ClientConfig,
    session: ChatSession,
    commands: mpsc::UnboundedReceiver<Command>,
    updates: mpsc::UnboundedSender<SessionUpdate>,
    status: watch::Sender<ConnectionStatus>,
}

impl Driver {
    async fn run(mut self) {
        while let Some(token) = self.session.token().map(str::to_owned) {
            let url = match self.config.join_url(&token, self.session.expected_name()) {
                Ok(url) => url,
                Err(err) => {
                    self.emit(SessionUpdate::DialFailed(err.to_string()));
                    self.session.logout();
                    break;
                }
            };
            self.publish();

            let code = match connect_async(url.as_str()).await {
                Ok((stream, _)) => {
                    let resumed = self.session.on_open();
                    self.publish();
                    info!(user = %self.session.expected_name(), resumed, "ws connected");
                    self.emit(if resumed { SessionUpdate::Resumed } else { SessionUpdate::Connected });
                    self.pump(stream).await
                }
                Err(err) => {
                    warn!(error = %err, "ws dial failed");
                    self.emit(SessionUpdate::DialFailed(err.to_string()));
                    None
                }
            };

            let outcome = self.session.on_close(code, &self.config.reconnect);
            self.publish();
            info!(code = ?outcome.code, cleared = outcome.cleared_messages, "ws disconnected");
            self.emit(SessionUpdate::Closed { code: outcome.code, reconnect_in: outcome.reconnect_in });

            let Some(delay) = outcome.reconnect_in else {
                break;
            };
            info!(?delay, "reconnecting");
            if !self.wait_for_redial(delay).await {
                self.session.logout();
                break;
            }
            self.session.on_redial();
        }
        self.publish();
    }

    /// Run one connection until it closes; returns the close code, if any.
    async fn pump(&mut self, stream: WsStream) -> Option<u16> {
        let (mut write, mut read) = stream.split();
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Send(body)) => {
                        if !self.forward(&mut write, &body).await {
                            return None;
                        }
                    }
                    Some(Command::Close) | None => {
                        self.session.begin_close();
                        self.publish();
                        close_socket(&mut write, &mut read, CloseCode::Away).await;
                        return Some(CLOSE_GOING_AWAY);
                    }
                },
                frame = read.next() => match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        self.on_text(text.as_str());
                        if self.session.status() == ConnectionStatus::Closing {
                            close_socket(&mut write, &mut read, CloseCode::Policy).await;
                            return Some(u16::from(CloseCode::Policy));
                        }
                    }
                    Some(Ok(WsMessage::Binary(bytes))) => {
                        warn!(len = bytes.len(), "unexpected binary frame");
                        if matches!(self.session.on_binary(), SessionEvent::Rejected) {
                            self.emit(SessionUpdate::Rejected);
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => return frame.map(|f| u16::from(f.code)),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "ws recv error");
                        return None;
                    }
                    None => return None,
                },
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        match self.session.on_text(text) {
            SessionEvent::Identity(user) => {
                debug!(id = %user.id, "identity assigned");
                self.emit(SessionUpdate::Identity(user));
            }
            SessionEvent::IdentityMismatch { expected, actual } => {
                warn!(%expected, %actual, "server assigned a different identity; closing");
                self.publish();
                self.emit(SessionUpdate::IdentityMismatch { expected, actual });
            }
            SessionEvent::Message(message) => {
                let scroll = self.session.take_scroll_request(&message);
                self.emit(SessionUpdate::Message { message, scroll });
            }
            SessionEvent::Discarded(err) => {
                warn!(error = %err, "discarding socket frame");
                self.emit(SessionUpdate::Discarded(err.to_string()));
            }
            SessionEvent::Rejected | SessionEvent::Ignored => {}
        }
    }

    async fn forward(&mut self, write: &mut WsWrite, body: &str) -> bool {
        let text = match self.session.compose(body) {
            Ok(text) => text,
            Err(err) => {
                self.emit(SessionUpdate::SendFailed(err.to_string()));
                return true;
            }
        };
        if let Err(err) = write.send(WsMessage::Text(text.into())).await {
            warn!(error = %err, "ws send failed");
            self.emit(SessionUpdate::SendFailed(err.to_string()));
            return false;
        }
        true
    }

    /// Sleep out the reconnect delay. Returns `false` if the caller closed.
    async fn wait_for_redial(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                () = &mut sleep => return true,
                command = self.commands.recv() => match command {
                    Some(Command::Send(_)) => {
                        self.emit(SessionUpdate::SendFailed(ClientError::SendOnClosed.to_string()));
                    }
                    Some(Command::Close) | None => return false,
                },
            }
        }
    }

    fn emit(&self, update: SessionUpdate) {
        if self.updates.send(update).is_err() {
            debug!("session update dropped; handle gone");
        }
    }

    fn publish(&self) {
        self.status.send_replace(self.session.status());
    }
}

async fn close_socket(write: &mut WsWrite, read: &mut WsRead, code: CloseCode) {
    let frame = CloseFrame { code, reason: String::new().into() };
    if let Err(err) = write.send(WsMessage::Close(Some(frame))).await {
        debug!(error = %err, "close frame not sent");
        return;
    }
    let ack = async {
        while let Some(Ok(frame)) = read.next().await {
            if let WsMessage::Close(_) = frame {
                break;
            }
        }
    };
    if tokio::time::timeout(CLOSE_ACK_TIMEOUT, ack).await.is_err() {
        debug!(timeout = ?CLOSE_ACK_TIMEOUT, "server did not acknowledge close; dropping stream");
    }
}
