//! HTTP auth and history client (native builds).
//!
//! ERROR HANDLING
//! ==============
//! Any status other than 200 is classified by [`HttpError::from_status`];
//! the body of a failed response is never read. Connection failures map to
//! [`ClientError::Transport`] and schema mismatches to [`ClientError::Decode`].

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, HttpError};
use crate::types::{HistoryPage, LoginRequest, LoginResponse};

/// Stateless HTTP client; the token is passed per call.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Build a client honoring the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the TLS backend fails to initialize.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(transport)?;
        Ok(Self { client, config: config.clone() })
    }

    /// `POST /login` and return the bearer token.
    ///
    /// # Errors
    ///
    /// `BadRequest` locally for blank credentials, otherwise the classified
    /// HTTP status, a transport error, or a body without `token`.
    pub async fn login(&self, user: &str, password: &str) -> Result<String, ClientError> {
        if user.is_empty() || password.is_empty() {
            return Err(HttpError::BadRequest.into());
        }
        let body = LoginRequest { user: user.to_owned(), password: password.to_owned() };
        let response = self
            .client
            .post(self.config.login_url())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let login: LoginResponse = read_json(response).await?;
        if login.token.is_empty() {
            return Err(ClientError::Decode("login response carried an empty token".to_owned()));
        }
        debug!(%user, "login succeeded");
        Ok(login.token)
    }

    /// `GET /logout` with the bearer token.
    ///
    /// # Errors
    ///
    /// Returns the classified HTTP status or a transport error.
    pub async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .get(self.config.logout_url())
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(transport)?;
        check_status(&response)?;
        Ok(())
    }

    /// `GET /history?page=<page>`. A missing `messages` field yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns the classified HTTP status, a transport error, or a body that
    /// does not match the page schema.
    pub async fn history(&self, page: i64, token: &str) -> Result<HistoryPage, ClientError> {
        let response = self
            .client
            .get(self.config.history_url(page))
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(transport)?;
        let history: HistoryPage = read_json(response).await?;
        debug!(requested = page, returned = history.page, count = history.messages.len(), "history page loaded");
        Ok(history)
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn check_status(response: &reqwest::Response) -> Result<(), ClientError> {
    let status = response.status().as_u16();
    HttpError::check(status).map_err(|err| {
        warn!(%status, url = %response.url(), "request failed");
        ClientError::Http(err)
    })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    check_status(&response)?;
    let bytes = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
