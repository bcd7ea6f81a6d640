//! REST helpers for the chat server endpoints.
//!
//! Browser (csr): real HTTP calls via `gloo-net`. Status classification,
//! request validation, and header formatting are plain functions so they can
//! be tested natively.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `chatroom::ClientError`; the page that issued it decides
//! how to surface the failure (blocking alert plus a notice).

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(any(test, feature = "csr"))]
use chatroom::types::{LoginRequest, LoginResponse};
#[cfg(any(test, feature = "csr"))]
use chatroom::{ClientError, HttpError};
#[cfg(feature = "csr")]
use chatroom::{ClientConfig, HistoryPage};

/// Validate credentials before any request goes out.
#[cfg(any(test, feature = "csr"))]
fn login_request(user: &str, password: &str) -> Result<LoginRequest, ClientError> {
    if user.is_empty() || password.is_empty() {
        return Err(HttpError::BadRequest.into());
    }
    Ok(LoginRequest { user: user.to_owned(), password: password.to_owned() })
}

#[cfg(any(test, feature = "csr"))]
fn check_status(status: u16) -> Result<(), ClientError> {
    HttpError::check(status).map_err(ClientError::from)
}

#[cfg(any(test, feature = "csr"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "csr"))]
fn login_token(body: LoginResponse) -> Result<String, ClientError> {
    if body.token.is_empty() {
        return Err(ClientError::Decode("login response carried an empty token".to_owned()));
    }
    Ok(body.token)
}

#[cfg(feature = "csr")]
fn transport(err: gloo_net::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

#[cfg(feature = "csr")]
fn decode(err: gloo_net::Error) -> ClientError {
    ClientError::Decode(err.to_string())
}

/// `POST /login`; returns the bearer token.
///
/// # Errors
///
/// `BadRequest` for blank credentials without a request, otherwise the
/// classified status, a transport failure, or a body without a token.
#[cfg(feature = "csr")]
pub async fn login(config: &ClientConfig, user: &str, password: &str) -> Result<String, ClientError> {
    let body = login_request(user, password)?;
    let resp = gloo_net::http::Request::post(&config.login_url())
        .json(&body)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;
    check_status(resp.status())?;
    let body: LoginResponse = resp.json().await.map_err(decode)?;
    login_token(body)
}

/// `GET /logout` with the bearer token.
///
/// # Errors
///
/// Returns the classified status or a transport failure.
#[cfg(feature = "csr")]
pub async fn logout(config: &ClientConfig, token: &str) -> Result<(), ClientError> {
    let resp = gloo_net::http::Request::get(&config.logout_url())
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(transport)?;
    check_status(resp.status())
}

/// `GET /history?page=<page>`.
///
/// # Errors
///
/// Returns the classified status, a transport failure, or a body that does
/// not match the page schema.
#[cfg(feature = "csr")]
pub async fn history(config: &ClientConfig, page: i64, token: &str) -> Result<HistoryPage, ClientError> {
    let resp = gloo_net::http::Request::get(&config.history_url(page))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(transport)?;
    check_status(resp.status())?;
    resp.json::<HistoryPage>().await.map_err(decode)
}
