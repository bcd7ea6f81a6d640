//! Client error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! HTTP failures are classified purely by status code; the response body is
//! never inspected. Socket-level failures (bad frames, identity mismatch,
//! sending while closed) get their own variants so callers can decide whether
//! to alert, log, or tear the socket down.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::config::ConfigError;
use crate::frame::FrameError;

/// Classified non-200 HTTP response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    #[error("BadRequest")]
    BadRequest,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ServerError")]
    ServerError,
    /// Any non-200 status outside the 400/401/500 table.
    #[error("unexpected HTTP status {0}")]
    Unexpected(u16),
}

impl HttpError {
    /// Classify a response status. Returns `None` for 200.
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200 => None,
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            500 => Some(Self::ServerError),
            other => Some(Self::Unexpected(other)),
        }
    }

    /// Turn a status into `Ok(())` or the classified error.
    ///
    /// # Errors
    ///
    /// Returns the classified [`HttpError`] for any status other than 200.
    pub fn check(status: u16) -> Result<(), Self> {
        Self::from_status(status).map_or(Ok(()), Err)
    }
}

/// Every failure a chat client operation can surface.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] HttpError),
    /// The request or socket could not be carried out at all.
    #[error("transport error: {0}")]
    Transport(String),
    /// A 200 response whose body did not match the expected schema.
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// The server announced a different name than the one used to log in.
    #[error("server assigned identity {actual:?}, expected {expected:?}")]
    IdentityMismatch { expected: String, actual: String },
    #[error("socket is not open")]
    SendOnClosed,
    #[error("message is empty")]
    EmptyMessage,
    #[error("not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
