//! Reconnect policy for the chat socket.
//!
//! Two behaviors exist in the wild: the current client never reconnects and
//! requires a fresh login after any close, while the early client redialed
//! one second after every close except code 1001 ("going away"). Both are
//! expressible here; [`ReconnectPolicy::Never`] is the default.

#[cfg(test)]
#[path = "reconnect_test.rs"]
mod reconnect_test;

use std::time::Duration;

/// WebSocket close code for an endpoint going away (page unload, user close).
pub const CLOSE_GOING_AWAY: u16 = 1001;

/// Delay used by [`ReconnectPolicy::legacy`].
pub const LEGACY_RECONNECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Never redial; a close ends the session.
    #[default]
    Never,
    /// Redial after a fixed delay.
    Fixed {
        delay: Duration,
        /// Close codes that end the session instead of redialing.
        exempt_codes: Vec<u16>,
        /// Consecutive redials allowed before giving up; `None` is unlimited.
        max_attempts: Option<u32>,
    },
}

impl ReconnectPolicy {
    /// The early client's behavior: 1s fixed delay, 1001 exempt, unlimited.
    #[must_use]
    pub fn legacy() -> Self {
        Self::Fixed { delay: LEGACY_RECONNECT_DELAY, exempt_codes: vec![CLOSE_GOING_AWAY], max_attempts: None }
    }

    /// Delay before redial attempt number `attempt` (1-based), if any.
    ///
    /// `close_code` is `None` when the connection dropped without a close
    /// frame. A close the client initiated itself never reconnects.
    #[must_use]
    pub fn delay_for(&self, close_code: Option<u16>, attempt: u32, client_initiated: bool) -> Option<Duration> {
        if client_initiated {
            return None;
        }
        match self {
            Self::Never => None,
            Self::Fixed { delay, exempt_codes, max_attempts } => {
                if close_code.is_some_and(|code| exempt_codes.contains(&code)) {
                    return None;
                }
                if max_attempts.is_some_and(|max| attempt > max) {
                    return None;
                }
                Some(*delay)
            }
        }
    }
}
