//! Error types for the client.
//!
//! Every failure a call can produce is a [`ClientError`] variant; the status
//! policy that picks a variant for a response lives in
//! [`classify`](super::classify).

use thiserror::Error;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received (DNS, connect, TLS, or body read failure).
    #[error("transport error calling {url}: {source}")]
    Transport {
        /// The URL being called.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Negotiation finished without the credentials the session needs.
    #[error("session bootstrap failed: {reason}")]
    SessionBootstrap {
        /// What was missing.
        reason: &'static str,
    },

    /// HTTP 401.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// HTTP 403 while authenticating with an API key.
    #[error("invalid API key")]
    InvalidApiKey,

    /// HTTP 403 while authenticating with the client-ID / CSRF session.
    #[error("invalid CSRF token")]
    InvalidCsrf,

    /// HTTP 404.
    #[error("invalid endpoint or API call")]
    InvalidEndpoint,

    /// Other non-200 status with a message from the server.
    #[error("{message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// The server's `error` field, or its trimmed body text.
        message: String,
    },

    /// Other non-200 status with an empty body.
    #[error("unknown HTTP status returned: {status_text}")]
    UnknownStatus {
        /// HTTP status code.
        status: u16,
        /// Status line text, e.g. `500 Internal Server Error`.
        status_text: String,
    },

    /// The response body did not match the expected JSON shape.
    #[error("failed to decode response body: {source}")]
    Decode {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The request value could not be serialized to JSON.
    #[error("failed to encode request body: {source}")]
    Encode {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The composed request URL is not a valid URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },

    /// A configured header name or value is not legal HTTP.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was rejected.
        reason: String,
    },
}

impl ClientError {
    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates a session bootstrap error.
    #[must_use]
    pub fn session_bootstrap(reason: &'static str) -> Self {
        Self::SessionBootstrap { reason }
    }

    /// Creates a remote error carrying the server's message.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Creates an unknown-status error from the status line text.
    pub fn unknown_status(status: u16, status_text: impl Into<String>) -> Self {
        Self::UnknownStatus {
            status,
            status_text: status_text.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// HTTP status that produced this error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidCredentials => Some(401),
            Self::InvalidApiKey | Self::InvalidCsrf => Some(403),
            Self::InvalidEndpoint => Some(404),
            Self::Remote { status, .. } | Self::UnknownStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
