//! Session bootstrap: discovers the client ID and CSRF token.

use reqwest::Method;

use super::error::ClientError;
use super::transport::{Outgoing, Transport};
use crate::logging::LogLevel;
use crate::session::Session;

impl Transport {
    /// Establishes the session credentials.
    ///
    /// In API-key mode this succeeds without any network call. Otherwise it
    /// sends a GET to the bare endpoint, lets the response update `session`,
    /// and requires a client ID plus, unless CSRF is disabled, a CSRF token.
    /// A 403 here does not trigger another refresh. On success the session is
    /// marked initialized.
    ///
    /// # Errors
    ///
    /// Any error from the bootstrap request itself, or
    /// [`ClientError::SessionBootstrap`] when credentials are missing.
    pub(crate) async fn negotiate(&self, session: &mut Session) -> Result<(), ClientError> {
        if self.config().api_key_mode() {
            session.mark_initialized();
            return Ok(());
        }

        let root = Outgoing::new(Method::GET, self.endpoint().to_string());
        self.dispatch(session, root).await?;
        session.verify(self.config().csrf_disable)?;

        self.log(
            LogLevel::Debug,
            format_args!("session established for client ID {}", session.client_id()),
        );
        session.mark_initialized();
        Ok(())
    }
}
