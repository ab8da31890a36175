//! Single-request dispatch: credential attachment, send, credential
//! extraction, status classification.

use std::fmt;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use tracing::instrument;
use url::Url;

use super::classify::classify_status;
use super::endpoint::join_url;
use super::error::ClientError;
use super::response::{ApiResponse, ResponseCookie};
use crate::config::ClientConfig;
use crate::logging::{LogLevel, Logger};
use crate::session::Session;
use crate::user_agent;

/// One outgoing request, before credentials are attached.
#[derive(Debug)]
pub(crate) struct Outgoing {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) body: Option<String>,
    pub(crate) json: bool,
}

impl Outgoing {
    pub(crate) fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            body: None,
            json: false,
        }
    }

    pub(crate) fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    pub(crate) fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

/// Immutable half of a client: HTTP stack, resolved header names, logger.
pub(crate) struct Transport {
    http: reqwest::Client,
    endpoint: String,
    config: ClientConfig,
    api_key: Option<(HeaderName, HeaderValue)>,
    client_id_header: Option<HeaderName>,
    logger: Logger,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("endpoint", &self.endpoint)
            .field("url_prefix", &self.config.url_prefix)
            .field("api_key_mode", &self.config.api_key_mode())
            .field("client_id_header", &self.client_id_header)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Resolves header names and builds the HTTP client.
    ///
    /// Certificate verification follows `config.verify_tls`, which is off by
    /// default.
    pub(crate) fn new(endpoint: String, config: ClientConfig) -> Result<Self, ClientError> {
        let api_key = match (config.api_key_header(), config.api_key()) {
            (Some(name), Some(key)) => {
                let name = parse_header_name(name, "API key header")?;
                let mut value = HeaderValue::from_str(key).map_err(|_| {
                    ClientError::invalid_config("API key is not a valid header value")
                })?;
                value.set_sensitive(true);
                Some((name, value))
            }
            _ => None,
        };
        let client_id_header = config
            .client_id_header()
            .map(|name| parse_header_name(name, "client ID header"))
            .transpose()?;

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .danger_accept_invalid_certs(!config.verify_tls);
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|error| {
            ClientError::invalid_config(format!("HTTP client construction failed: {error}"))
        })?;

        let logger = Logger::new(&config.log);
        Ok(Self {
            http,
            endpoint,
            config,
            api_key,
            client_id_header,
            logger,
        })
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    pub(crate) fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.logger.log(level, args);
    }

    /// Absolute URL for a call path.
    pub(crate) fn url_for(&self, path: &str) -> String {
        join_url(&self.endpoint, &self.config.url_prefix, path)
    }

    /// Sends one request and returns the buffered response.
    ///
    /// Credentials from `session` are attached before sending, and every
    /// received response updates `session` before its status is classified,
    /// except in API-key mode where the session stays empty.
    #[instrument(level = "debug", skip_all, fields(method = %outgoing.method, url = %outgoing.url))]
    pub(crate) async fn dispatch(
        &self,
        session: &mut Session,
        outgoing: Outgoing,
    ) -> Result<ApiResponse, ClientError> {
        let Outgoing {
            method,
            url,
            body,
            json,
        } = outgoing;
        let parsed = Url::parse(&url).map_err(|_| ClientError::invalid_url(&url))?;

        let mut request = self.http.request(method.clone(), parsed);
        if let Some(body) = body {
            if json {
                request = request.header(CONTENT_TYPE, "application/json");
            }
            request = request.body(body);
        }
        request = self.attach_credentials(request, session);

        self.log(LogLevel::Debug, format_args!("HTTP {method} {url}"));
        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                self.log(LogLevel::Info, format_args!("{error}"));
                return Err(ClientError::transport(url, error));
            }
        };
        let status = response.status();
        self.log(LogLevel::Debug, format_args!("HTTP RESPONSE: {status}"));

        let headers = response.headers().clone();
        let cookies: Vec<ResponseCookie> = response
            .cookies()
            .map(|cookie| ResponseCookie {
                name: cookie.name().to_string(),
                value: cookie.value().to_string(),
            })
            .collect();
        if !self.config.api_key_mode() {
            session.absorb(
                self.client_id_header.as_ref(),
                &headers,
                &cookies,
                &self.logger,
            );
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| ClientError::transport(&url, error))?;
        classify_status(status, &body, self.config.api_key_mode())?;

        Ok(ApiResponse {
            status,
            headers,
            cookies,
            body: body.to_vec(),
        })
    }

    fn attach_credentials(&self, mut request: RequestBuilder, session: &Session) -> RequestBuilder {
        if let Some((name, value)) = &self.api_key {
            request = request.header(name.clone(), value.clone());
        }
        if let Some(name) = &self.client_id_header
            && let Some(value) = session.client_id_value()
        {
            request = request.header(name.clone(), value);
        }
        if let Some((username, password)) = self.config.basic_auth() {
            request = request.basic_auth(username, Some(password));
        }
        if let Some((name, value)) = session.csrf_header(&self.logger) {
            request = request.header(name, value);
        }
        request
    }
}

fn parse_header_name(name: &str, what: &str) -> Result<HeaderName, ClientError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
        ClientError::invalid_config(format!("{what} {name:?} is not a valid header name"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_illegal_client_id_header() {
        let config = ClientConfig {
            client_id_header: Some("Client ID".to_string()),
            ..ClientConfig::default()
        };
        let err = Transport::new("http://h".to_string(), config).unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig { .. }), "{err:?}");
    }

    #[test]
    fn test_new_rejects_api_key_with_newline() {
        let config = ClientConfig {
            api_key_header: Some("X-API-Key".to_string()),
            api_key: Some("abc\ndef".to_string()),
            ..ClientConfig::default()
        };
        let err = Transport::new("http://h".to_string(), config).unwrap_err();
        assert!(err.to_string().contains("API key"), "{err}");
    }

    #[test]
    fn test_api_key_without_header_name_is_not_attached() {
        let config = ClientConfig {
            api_key: Some("secret".to_string()),
            ..ClientConfig::default()
        };
        let transport = Transport::new("http://h".to_string(), config).unwrap();
        assert!(transport.api_key.is_none());
        assert!(transport.config().api_key_mode());
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let config = ClientConfig {
            api_key_header: Some("X-API-Key".to_string()),
            api_key: Some("super-secret".to_string()),
            ..ClientConfig::default()
        };
        let transport = Transport::new("http://h".to_string(), config).unwrap();
        let debug = format!("{transport:?}");
        assert!(!debug.contains("super-secret"), "{debug}");
    }

    #[test]
    fn test_url_for_uses_prefix() {
        let config = ClientConfig {
            url_prefix: "/rest/".to_string(),
            ..ClientConfig::default()
        };
        let transport = Transport::new("http://h/".to_string(), config).unwrap();
        assert_eq!(transport.url_for("/system/ping"), "http://h/rest/system/ping");
    }
}
