//! Session state for cookie/CSRF authentication.
//!
//! A backend that does not use an API key identifies the caller by a
//! server-issued client ID (announced in a configurable response header) and
//! protects mutations with a CSRF token delivered in a cookie named after the
//! first five characters of that ID:
//!
//! - response header `<client-id-header>: abc123` sets the client ID
//! - response cookie `CSRF-Token-abc12=tok` sets the CSRF token
//! - requests echo `<client-id-header>: abc123` and `X-CSRF-Token-abc12: tok`
//!
//! [`Session`] holds that state and implements the extraction and naming
//! rules. The network side of negotiation lives in [`crate::client`].

mod constants;
mod state;

pub use constants::{CLIENT_ID_SCOPE_LEN, CSRF_COOKIE_PREFIX, CSRF_HEADER_PREFIX};
pub use state::{Session, client_id_scope, csrf_cookie_name, csrf_header_name};
