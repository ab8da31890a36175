//! Request pipeline, session negotiation and status classification.
//!
//! A call flows through these steps:
//!
//! 1. The input value (if any) is serialized to a JSON body.
//! 2. The session lock is taken; an uninitialized session gets one
//!    best-effort bootstrap.
//! 3. Credentials are attached: API key header, client-ID header, basic
//!    auth, `X-CSRF-Token-<scope>` header.
//! 4. The request is sent and every response updates the session (client ID
//!    header, `CSRF-Token-<scope>` cookie).
//! 5. The status is classified; a 403 in session mode refreshes the session
//!    once for later calls.
//! 6. High-level verbs decode the JSON body.
//!
//! TLS certificates are not verified unless
//! [`ClientConfig::verify_tls`](crate::ClientConfig::verify_tls) is set.

mod classify;
mod endpoint;
mod error;
mod negotiator;
mod pipeline;
mod response;
mod transport;

pub use classify::classify_status;
pub use endpoint::join_url;
pub use error::ClientError;
pub use pipeline::Client;
pub use response::{ApiResponse, ResponseCookie};
