//! Visible connection and publish notices.
//!
//! Publish failures and socket events are appended here instead of
//! interrupting the user. The log keeps the newest [`MAX_NOTICES`] entries.

#[cfg(test)]
#[path = "notices_test.rs"]
mod notices_test;

use std::collections::VecDeque;

pub const MAX_NOTICES: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Monotonic id, stable across evictions; used as the render key.
    pub seq: u64,
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub struct NoticeLog {
    entries: VecDeque<Notice>,
    next_seq: u64,
}

impl NoticeLog {
    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>) {
        if self.entries.len() == MAX_NOTICES {
            self.entries.pop_front();
        }
        self.entries.push_back(Notice { seq: self.next_seq, level, text: text.into() });
        self.next_seq += 1;
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Info, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text);
    }

    /// Record a message that could not be sent.
    pub fn publish_failed(&mut self, reason: &str) {
        self.error(publish_failed_text(reason));
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub fn publish_failed_text(reason: &str) -> String {
    format!("Publish failed: {reason}")
}
