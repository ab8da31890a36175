//! The client and its verb surface.

use std::fmt;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::instrument;

use super::error::ClientError;
use super::response::ApiResponse;
use super::transport::{Outgoing, Transport};
use crate::config::ClientConfig;
use crate::logging::{LogLevel, UnknownLogLevel};
use crate::session::Session;

/// Stateful HTTP client for one backend session.
///
/// The session (client ID, CSRF token, initialized flag) sits behind one
/// async mutex. Each call holds it from the lazy bootstrap through credential
/// attachment, the request itself, credential extraction and the optional
/// 403 refresh, so concurrent calls on a shared client are serialized.
///
/// # Example
///
/// ```no_run
/// use sessionclient_core::{Client, ClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig {
///     url_prefix: "rest".to_string(),
///     client_id_header: Some("X-Client-ID".to_string()),
///     ..ClientConfig::default()
/// };
/// let client = Client::new("https://127.0.0.1:8384", config)?;
/// let status: serde_json::Value = client.get("system/status").await?;
/// println!("{status}");
/// # Ok(())
/// # }
/// ```
pub struct Client {
    transport: Transport,
    session: Mutex<Session>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client without contacting the server.
    ///
    /// The session is negotiated lazily by the first call.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidConfig`] when a configured header name or the API
    /// key is not legal HTTP, or the HTTP stack cannot be built.
    pub fn new(endpoint: impl Into<String>, config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(endpoint.into(), config)?,
            session: Mutex::new(Session::default()),
        })
    }

    /// Creates a client and negotiates the session immediately.
    ///
    /// # Errors
    ///
    /// Construction errors as in [`Client::new`], and any bootstrap failure.
    pub async fn connect(
        endpoint: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let client = Self::new(endpoint, config)?;
        if let Err(error) = client.bootstrap().await {
            client.log(
                LogLevel::Error,
                format_args!("Cannot retrieve client ID and/or CSRF token: {error}"),
            );
            return Err(error);
        }
        client.log(
            LogLevel::Debug,
            format_args!("HTTP client url {} init done", client.endpoint()),
        );
        Ok(client)
    }

    /// Base endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Current logger level.
    #[must_use]
    pub fn log_level(&self) -> LogLevel {
        self.transport.logger().level()
    }

    /// Sets the logger level from its name (`panic`, `error`, `warn`,
    /// `warning`, `info`, `debug`; case-insensitive).
    ///
    /// # Errors
    ///
    /// [`UnknownLogLevel`] for any other name; the level is unchanged.
    pub fn set_log_level(&self, level: &str) -> Result<(), UnknownLogLevel> {
        self.transport.logger().set_level(level.parse()?);
        Ok(())
    }

    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.transport.log(level, args);
    }

    /// Snapshot of the session state.
    pub async fn session(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Client ID announced by the server, empty when unknown.
    pub async fn client_id(&self) -> String {
        self.session.lock().await.client_id().to_string()
    }

    /// Current CSRF token, empty when unknown.
    pub async fn csrf_token(&self) -> String {
        self.session.lock().await.csrf_token().to_string()
    }

    /// Whether a bootstrap has succeeded.
    pub async fn is_initialized(&self) -> bool {
        self.session.lock().await.is_initialized()
    }

    /// Negotiates the session now.
    ///
    /// Returns immediately in API-key mode.
    ///
    /// # Errors
    ///
    /// Any error from the bootstrap request, or
    /// [`ClientError::SessionBootstrap`] when the client ID or the required
    /// CSRF token was not provided.
    pub async fn bootstrap(&self) -> Result<(), ClientError> {
        let mut session = self.session.lock().await;
        self.transport.negotiate(&mut session).await
    }

    // ---- High-level JSON verbs ----

    /// GETs `path` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`]; [`ClientError::Decode`] when the body is not `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.request::<()>(Method::GET, path, None).await?;
        decode(&response)
    }

    /// GETs `path`, ignoring the body of a 200 response.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except [`ClientError::Decode`].
    pub async fn get_discard(&self, path: &str) -> Result<(), ClientError> {
        self.request::<()>(Method::GET, path, None).await.map(drop)
    }

    /// POSTs `input` as JSON and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`].
    pub async fn post<I, T>(&self, path: &str, input: &I) -> Result<T, ClientError>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path, Some(input)).await?;
        decode(&response)
    }

    /// POSTs `input` as JSON, ignoring the body of a 200 response.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except [`ClientError::Decode`].
    pub async fn post_discard<I>(&self, path: &str, input: &I) -> Result<(), ClientError>
    where
        I: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(input)).await.map(drop)
    }

    /// PUTs `input` as JSON and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`].
    pub async fn put<I, T>(&self, path: &str, input: &I) -> Result<T, ClientError>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::PUT, path, Some(input)).await?;
        decode(&response)
    }

    /// PUTs `input` as JSON, ignoring the body of a 200 response.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except [`ClientError::Decode`].
    pub async fn put_discard<I>(&self, path: &str, input: &I) -> Result<(), ClientError>
    where
        I: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(input)).await.map(drop)
    }

    /// DELETEs `path` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.request::<()>(Method::DELETE, path, None).await?;
        decode(&response)
    }

    /// DELETEs `path`, ignoring the body of a 200 response.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except [`ClientError::Decode`].
    pub async fn delete_discard(&self, path: &str) -> Result<(), ClientError> {
        self.request::<()>(Method::DELETE, path, None).await.map(drop)
    }

    // ---- Low-level verbs ----

    /// GETs `path` and returns the raw body.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except encode/decode errors.
    pub async fn http_get(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        Ok(self.http_get_with_response(path).await?.body)
    }

    /// GETs `path` and returns the full response.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except encode/decode errors.
    pub async fn http_get_with_response(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.execute(Outgoing::new(Method::GET, self.transport.url_for(path)))
            .await
    }

    /// POSTs a literal string body.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except encode/decode errors.
    pub async fn http_post(&self, path: &str, body: &str) -> Result<(), ClientError> {
        self.http_post_with_response(path, body).await.map(drop)
    }

    /// POSTs a literal string body and returns the full response.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except encode/decode errors.
    pub async fn http_post_with_response(
        &self,
        path: &str,
        body: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(
            Outgoing::new(Method::POST, self.transport.url_for(path))
                .with_body(Some(body.to_string())),
        )
        .await
    }

    /// PUTs a literal string body.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except encode/decode errors.
    pub async fn http_put(&self, path: &str, body: &str) -> Result<(), ClientError> {
        self.http_put_with_response(path, body).await.map(drop)
    }

    /// PUTs a literal string body and returns the full response.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except encode/decode errors.
    pub async fn http_put_with_response(
        &self,
        path: &str,
        body: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(
            Outgoing::new(Method::PUT, self.transport.url_for(path))
                .with_body(Some(body.to_string())),
        )
        .await
    }

    /// DELETEs `path`.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except encode/decode errors.
    pub async fn http_delete(&self, path: &str) -> Result<(), ClientError> {
        self.http_delete_with_response(path).await.map(drop)
    }

    /// DELETEs `path` and returns the full response.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] except encode/decode errors.
    pub async fn http_delete_with_response(
        &self,
        path: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(Outgoing::new(Method::DELETE, self.transport.url_for(path)))
            .await
    }

    // ---- Pipeline ----

    async fn request<I>(
        &self,
        method: Method,
        path: &str,
        input: Option<&I>,
    ) -> Result<ApiResponse, ClientError>
    where
        I: Serialize + ?Sized,
    {
        let outgoing = Outgoing::new(method, self.transport.url_for(path));
        let outgoing = match input {
            Some(value) => {
                let body = serde_json::to_string(value)
                    .map_err(|source| ClientError::Encode { source })?;
                outgoing.with_body(Some(body)).json()
            }
            None => outgoing,
        };
        self.execute(outgoing).await
    }

    /// Runs one call under the session lock.
    ///
    /// An uninitialized session gets one best-effort bootstrap first; its
    /// failure is logged and the call proceeds. A 403 in session mode triggers
    /// one refresh for later calls, and the call still fails with
    /// [`ClientError::InvalidCsrf`].
    #[instrument(level = "debug", skip_all, fields(method = %outgoing.method, url = %outgoing.url))]
    async fn execute(&self, outgoing: Outgoing) -> Result<ApiResponse, ClientError> {
        let mut session = self.session.lock().await;

        if !session.is_initialized()
            && let Err(error) = self.transport.negotiate(&mut session).await
        {
            self.log(
                LogLevel::Debug,
                format_args!("lazy session bootstrap failed: {error}"),
            );
        }

        let result = self.transport.dispatch(&mut session, outgoing).await;

        if matches!(result, Err(ClientError::InvalidCsrf)) {
            self.log(
                LogLevel::Debug,
                format_args!("HTTP 403 in session mode; refreshing client ID and CSRF token"),
            );
            if let Err(error) = self.transport.negotiate(&mut session).await {
                self.log(LogLevel::Debug, format_args!("session refresh failed: {error}"));
            }
        }

        result
    }
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ClientError> {
    serde_json::from_slice(&response.body).map_err(|source| ClientError::Decode { source })
}
