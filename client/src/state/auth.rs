//! Sign-in state for the current browser tab.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` renders the login form or the chat page from this. The bearer token
//! itself lives in the chat session, not here.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Name the user signed in with.
    pub user: Option<String>,
    /// A login request is in flight.
    pub busy: bool,
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn sign_in(&mut self, user: String) {
        self.user = Some(user);
        self.busy = false;
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.busy = false;
    }
}
