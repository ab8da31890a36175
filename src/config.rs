//! Client configuration, supplied once at construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::logging::LogConfig;

/// Immutable settings for a [`Client`](crate::Client).
///
/// Empty strings count as "not configured" for every optional name and
/// secret, so a config loaded from JSON with `"api_key": ""` stays in
/// cookie/CSRF mode.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path segment inserted between the endpoint and every call path.
    pub url_prefix: String,
    /// Request header carrying the API key.
    pub api_key_header: Option<String>,
    /// Static API key. When set, session negotiation is skipped entirely.
    pub api_key: Option<String>,
    /// Header the server uses to announce the client ID, echoed back on requests.
    pub client_id_header: Option<String>,
    /// Accept a session without a CSRF token.
    pub csrf_disable: bool,
    /// Basic-auth user name.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Verify server TLS certificates. Off unless explicitly enabled.
    pub verify_tls: bool,
    /// TCP connect timeout in seconds. No timeout when unset.
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds. No timeout when unset.
    pub timeout_secs: Option<u64>,
    /// Logger options.
    pub log: LogConfig,
}

impl ClientConfig {
    /// Returns the API key when one is configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    /// True when requests authenticate with the static API key.
    #[must_use]
    pub fn api_key_mode(&self) -> bool {
        self.api_key().is_some()
    }

    pub(crate) fn api_key_header(&self) -> Option<&str> {
        non_empty(self.api_key_header.as_deref())
    }

    pub(crate) fn client_id_header(&self) -> Option<&str> {
        non_empty(self.client_id_header.as_deref())
    }

    /// Basic-auth credentials, when either half is configured.
    pub(crate) fn basic_auth(&self) -> Option<(&str, &str)> {
        let username = non_empty(self.username.as_deref());
        let password = non_empty(self.password.as_deref());
        if username.is_none() && password.is_none() {
            return None;
        }
        Some((username.unwrap_or_default(), password.unwrap_or_default()))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url_prefix", &self.url_prefix)
            .field("api_key_header", &self.api_key_header)
            .field("api_key", &redacted(self.api_key.as_deref()))
            .field("client_id_header", &self.client_id_header)
            .field("csrf_disable", &self.csrf_disable)
            .field("username", &self.username)
            .field("password", &redacted(self.password.as_deref()))
            .field("verify_tls", &self.verify_tls)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .field("log", &self.log)
            .finish()
    }
}

/// Placeholder shown instead of a configured secret.
fn redacted(secret: Option<&str>) -> Option<&'static str> {
    non_empty(secret).map(|_| "[REDACTED]")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
