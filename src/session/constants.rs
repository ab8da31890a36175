//! Wire naming for the client-ID / CSRF session convention.

/// Name prefix of the response cookie carrying the CSRF token.
pub const CSRF_COOKIE_PREFIX: &str = "CSRF-Token-";

/// Name prefix of the request header echoing the CSRF token.
pub const CSRF_HEADER_PREFIX: &str = "X-CSRF-Token-";

/// Number of leading client-ID characters used to scope the CSRF names.
pub const CLIENT_ID_SCOPE_LEN: usize = 5;
