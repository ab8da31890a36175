//! Default User-Agent sent with every request.

/// `sessionclient/<version>`, identifying the crate and its version.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("sessionclient/{version}")
}
