//! Shared wire-protocol DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types mirror the server's JSON payloads. Users and messages are only
//! ever created from server data; the client never mints ids.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// A chat participant as assigned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque server-assigned identifier.
    #[serde(alias = "Id")]
    pub id: String,
    /// Display name used at login.
    #[serde(alias = "Name")]
    pub name: String,
}

/// A single chat message. Immutable once received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    #[serde(alias = "User")]
    pub user: User,
    /// Server timestamp (RFC 3339 from the current server).
    #[serde(alias = "Time")]
    pub time: String,
    /// Message text, verbatim.
    #[serde(alias = "Body")]
    pub body: String,
}

impl Message {
    /// Wall-clock label for the message, e.g. `12:00:00`.
    ///
    /// Falls back to the raw `time` string when it is not RFC 3339.
    #[must_use]
    pub fn time_label(&self) -> String {
        let Ok(parsed) = OffsetDateTime::parse(&self.time, &Rfc3339) else {
            return self.time.clone();
        };
        parsed
            .format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_else(|_| self.time.clone())
    }

    /// Whether this message was authored by the given user id.
    #[must_use]
    pub fn is_from(&self, user_id: &str) -> bool {
        self.user.id == user_id
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.user.name, self.body)
    }
}

/// Body of `POST /login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
}

/// Successful `POST /login` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// One page of `GET /history`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    /// Page number the server actually returned.
    pub page: i64,
    /// Messages oldest-first. The server omits the field for an empty page.
    #[serde(default)]
    pub messages: Vec<Message>,
}
