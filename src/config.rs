//! Client configuration and endpoint construction.
//!
//! Native callers build the config from environment variables; the browser
//! client builds it from `window.location`. Either way every URL the client
//! dials comes from here.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::reconnect::{CLOSE_GOING_AWAY, LEGACY_RECONNECT_DELAY, ReconnectPolicy};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL {0:?}: expected http:// or https://")]
    InvalidBaseUrl(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin, e.g. `http://127.0.0.1:8080`, without trailing slash.
    pub base_url: String,
    pub reconnect: ReconnectPolicy,
    /// Also send `user=<name>` on the join URL (early server variant).
    pub join_with_user: bool,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            reconnect: ReconnectPolicy::default(),
            join_with_user: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Config for a server origin with every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless `base_url` is http(s).
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, ..Self::default() })
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `CHAT_BASE_URL`: default `http://127.0.0.1:8080`
    /// - `CHAT_RECONNECT`: `never` (default), `legacy`, or `fixed`
    /// - `CHAT_RECONNECT_DELAY_MS`: delay for `fixed`, default 1000
    /// - `CHAT_RECONNECT_MAX_ATTEMPTS`: attempt cap for `fixed`, default unlimited
    /// - `CHAT_JOIN_WITH_USER`: `true`/`false`, default false
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = normalize_base_url(&lookup("CHAT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()))?;
        let reconnect = parse_reconnect(&lookup)?;
        let join_with_user = match lookup("CHAT_JOIN_WITH_USER") {
            Some(raw) => parse_bool("CHAT_JOIN_WITH_USER", &raw)?,
            None => false,
        };
        let request_timeout_secs = match lookup("CHAT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_u64("CHAT_REQUEST_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        Ok(Self { base_url, reconnect, join_with_user, request_timeout_secs })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url)
    }

    #[must_use]
    pub fn logout_url(&self) -> String {
        format!("{}/logout", self.base_url)
    }

    #[must_use]
    pub fn history_url(&self, page: i64) -> String {
        format!("{}/history?page={page}", self.base_url)
    }

    /// WebSocket URL for joining the room with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL is not http(s).
    pub fn join_url(&self, token: &str, user: &str) -> Result<String, ConfigError> {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        };

        let mut url = format!("{ws_base}/join?token={}", urlencoding::encode(token));
        if self.join_with_user {
            url.push_str("&user=");
            url.push_str(&urlencoding::encode(user));
        }
        Ok(url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_owned())),
    }
}

fn parse_reconnect<F>(lookup: &F) -> Result<ReconnectPolicy, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup("CHAT_RECONNECT").unwrap_or_else(|| "never".to_owned());
    match raw.trim().to_ascii_lowercase().as_str() {
        "never" | "" => Ok(ReconnectPolicy::Never),
        "legacy" => Ok(ReconnectPolicy::legacy()),
        "fixed" => {
            let delay = match lookup("CHAT_RECONNECT_DELAY_MS") {
                Some(ms) => Duration::from_millis(parse_u64("CHAT_RECONNECT_DELAY_MS", &ms)?),
                None => LEGACY_RECONNECT_DELAY,
            };
            let max_attempts = match lookup("CHAT_RECONNECT_MAX_ATTEMPTS") {
                Some(n) => Some(
                    n.trim()
                        .parse::<u32>()
                        .map_err(|_| ConfigError::InvalidValue { key: "CHAT_RECONNECT_MAX_ATTEMPTS", value: n.clone() })?,
                ),
                None => None,
            };
            Ok(ReconnectPolicy::Fixed { delay, exempt_codes: vec![CLOSE_GOING_AWAY], max_attempts })
        }
        _ => Err(ConfigError::InvalidValue { key: "CHAT_RECONNECT", value: raw }),
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue { key, value: raw.to_owned() })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value: raw.to_owned() }),
    }
}
