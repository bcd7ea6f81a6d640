//! Chat session state shared by the socket task and the chat components.
//!
//! DESIGN
//! ======
//! Wraps one `ChatSession` per login. Every login bumps `generation`; the
//! socket task started for that login passes its generation to each call, and
//! once it no longer matches (logout, or a newer login) the calls become
//! no-ops so a late socket event or history response cannot leak into the
//! next session.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use chatroom::session::CloseOutcome;
use chatroom::{ChatSession, ReconnectPolicy, SessionEvent};

#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub session: ChatSession,
    generation: u64,
    /// Bumped when the list should jump to the newest entry.
    scroll_seq: u64,
    /// Bumped whenever a history page is merged in.
    history_seq: u64,
}

impl ChatState {
    /// Replace the session for a fresh login; returns its generation.
    pub fn start(&mut self, token: String, user: String) -> u64 {
        self.generation += 1;
        self.session = ChatSession::new(token, user);
        self.generation
    }

    /// End the current session locally; returns the token for server logout.
    pub fn stop(&mut self) -> Option<String> {
        self.generation += 1;
        self.session.logout()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn scroll_seq(&self) -> u64 {
        self.scroll_seq
    }

    pub fn history_seq(&self) -> u64 {
        self.history_seq
    }

    /// `(token, user)` to dial with, if the session is still wanted.
    pub fn dial_target(&self, generation: u64) -> Option<(String, String)> {
        if !self.is_current(generation) {
            return None;
        }
        let token = self.session.token()?;
        Some((token.to_owned(), self.session.expected_name().to_owned()))
    }

    /// The socket reached OPEN. `None` for a stale generation, otherwise
    /// whether this open resumed the session after a reconnect.
    pub fn opened(&mut self, generation: u64) -> Option<bool> {
        if !self.is_current(generation) {
            return None;
        }
        Some(self.session.on_open())
    }

    /// Apply an inbound text frame; `None` once the generation is stale.
    pub fn receive(&mut self, generation: u64, text: &str) -> Option<SessionEvent> {
        if !self.is_current(generation) {
            return None;
        }
        let event = self.session.on_text(text);
        if let SessionEvent::Message(msg) = &event {
            if self.session.take_scroll_request(msg) {
                self.scroll_seq += 1;
            }
        }
        Some(event)
    }

    pub fn begin_close(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.session.begin_close();
        }
    }

    pub fn closed(&mut self, generation: u64, code: Option<u16>, policy: &ReconnectPolicy) -> Option<CloseOutcome> {
        if !self.is_current(generation) {
            return None;
        }
        Some(self.session.on_close(code, policy))
    }

    pub fn redial(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.session.on_redial();
        true
    }

    /// Claim the next history fetch: `(generation, token, page)`.
    pub fn begin_history(&mut self) -> Option<(u64, String, i64)> {
        let (token, page) = self.session.begin_history()?;
        Some((self.generation, token, page))
    }

    pub fn apply_history(&mut self, generation: u64, token: &str, page: chatroom::HistoryPage) -> bool {
        if !self.is_current(generation) || !self.session.apply_history(token, page) {
            return false;
        }
        self.history_seq += 1;
        true
    }

    pub fn fail_history(&mut self, generation: u64, token: &str) {
        if self.is_current(generation) {
            self.session.fail_history(token);
        }
    }
}
