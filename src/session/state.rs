//! Mutable session state and the credential extraction rules.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::constants::{CLIENT_ID_SCOPE_LEN, CSRF_COOKIE_PREFIX, CSRF_HEADER_PREFIX};
use crate::client::{ClientError, ResponseCookie};
use crate::logging::{LogLevel, Logger};

/// Returns the first [`CLIENT_ID_SCOPE_LEN`] characters of a client ID.
///
/// IDs shorter than that are returned whole.
#[must_use]
pub fn client_id_scope(client_id: &str) -> &str {
    match client_id.char_indices().nth(CLIENT_ID_SCOPE_LEN) {
        Some((end, _)) => &client_id[..end],
        None => client_id,
    }
}

/// Name of the cookie carrying the CSRF token for `client_id`.
#[must_use]
pub fn csrf_cookie_name(client_id: &str) -> String {
    format!("{CSRF_COOKIE_PREFIX}{}", client_id_scope(client_id))
}

/// Name of the request header echoing the CSRF token for `client_id`.
#[must_use]
pub fn csrf_header_name(client_id: &str) -> String {
    format!("{CSRF_HEADER_PREFIX}{}", client_id_scope(client_id))
}

/// Client ID, CSRF token and initialization flag of one client.
///
/// Both strings are empty until discovered. In API-key mode they stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    client_id: String,
    csrf_token: String,
    initialized: bool,
}

impl Session {
    /// Server-issued client ID, empty when unknown.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Current CSRF token, empty when unknown.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Whether a bootstrap has succeeded for this session.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Updates the session from a response.
    ///
    /// A non-empty client-ID header different from the stored ID replaces it.
    /// Then the first cookie named [`csrf_cookie_name`] of the (possibly new)
    /// ID replaces the CSRF token. Missing values leave the state untouched.
    pub fn absorb(
        &mut self,
        client_id_header: Option<&HeaderName>,
        headers: &HeaderMap,
        cookies: &[ResponseCookie],
        logger: &Logger,
    ) {
        if let Some(name) = client_id_header
            && let Some(announced) = headers.get(name).and_then(|v| v.to_str().ok())
            && !announced.is_empty()
            && announced != self.client_id
        {
            logger.log(LogLevel::Debug, format_args!("client ID changed: {announced}"));
            self.client_id = announced.to_string();
        }

        if self.client_id.is_empty() {
            return;
        }

        let cookie_name = csrf_cookie_name(&self.client_id);
        if let Some(cookie) = cookies.iter().find(|c| c.name == cookie_name) {
            if cookie.value != self.csrf_token {
                logger.log(LogLevel::Debug, format_args!("CSRF token rotated ({cookie_name})"));
            }
            self.csrf_token.clone_from(&cookie.value);
        }
    }

    /// The `X-CSRF-Token-<scope>` header to attach, when a token is known.
    ///
    /// Returns `None` if the derived name or the token is not a legal header.
    #[must_use]
    pub fn csrf_header(&self, logger: &Logger) -> Option<(HeaderName, HeaderValue)> {
        if self.csrf_token.is_empty() || self.client_id.is_empty() {
            return None;
        }
        let name = csrf_header_name(&self.client_id);
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&self.csrf_token),
        ) {
            (Ok(name), Ok(value)) => Some((name, value)),
            _ => {
                logger.log(
                    LogLevel::Warning,
                    format_args!("CSRF header {name} is not a valid HTTP header; not sent"),
                );
                None
            }
        }
    }

    /// The client-ID header value to echo, when an ID is known.
    #[must_use]
    pub fn client_id_value(&self) -> Option<HeaderValue> {
        if self.client_id.is_empty() {
            return None;
        }
        HeaderValue::from_str(&self.client_id).ok()
    }

    /// Checks that negotiation produced the required credentials.
    ///
    /// # Errors
    ///
    /// [`ClientError::SessionBootstrap`] when the client ID is missing, or the
    /// CSRF token is missing while CSRF is enforced.
    pub(crate) fn verify(&self, csrf_disable: bool) -> Result<(), ClientError> {
        if self.client_id.is_empty() {
            return Err(ClientError::session_bootstrap("missing client id"));
        }
        if !csrf_disable && self.csrf_token.is_empty() {
            return Err(ClientError::session_bootstrap("missing csrf token"));
        }
        Ok(())
    }
}
