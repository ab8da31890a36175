//! Buffered response returned by the low-level verbs.

use std::fmt;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// A cookie set by a response.
#[derive(Clone, PartialEq, Eq)]
pub struct ResponseCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value (may be a credential; redacted in Debug output).
    pub value: String,
}

impl fmt::Debug for ResponseCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Status, headers, cookies and body of a completed call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Cookies set by the response, in header order.
    pub cookies: Vec<ResponseCookie>,
    /// Full body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Body as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
