//! Decoding of server-to-client socket frames.
//!
//! The server pushes two JSON shapes over the socket with no explicit
//! discriminator: an identity assignment (`{id, name}`) and a chat message
//! (`{user, time, body}`). [`ServerFrame::decode`] turns a text frame into one
//! of those variants and fails closed on anything else.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use serde::Deserialize;

use crate::types::{Message, User};

/// Error returned by [`ServerFrame::decode`].
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The text frame is not valid JSON.
    #[error("malformed socket frame: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Valid JSON that matches no known frame shape.
    #[error("unrecognized socket frame: {0}")]
    Unrecognized(String),
}

/// A decoded server-to-client frame.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    /// A chat message. Tried first so a payload carrying both shapes is a message.
    Message(Message),
    /// The server's identity assignment for this connection.
    WhoAmI(User),
}

impl ServerFrame {
    /// Decode a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Malformed`] for invalid JSON and
    /// [`FrameError::Unrecognized`] for JSON of an unknown shape.
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let value = serde_json::from_str::<serde_json::Value>(text)?;
        if !value.is_object() {
            return Err(FrameError::Unrecognized(preview(text)));
        }
        Self::deserialize(value).map_err(|_| FrameError::Unrecognized(preview(text)))
    }
}

const PREVIEW_CHARS: usize = 120;

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}
