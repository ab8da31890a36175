//! CLI argument definitions using clap derive macros.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use sessionclient_core::{ClientConfig, LogLevel, LogSink};

/// Call a session-authenticated HTTP API.
///
/// Negotiates the client ID and CSRF token (or uses an API key), sends one
/// request and prints the response body.
#[derive(Parser)]
#[command(name = "sessionclient")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// JSON file with client configuration; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path prefix inserted before every request path
    #[arg(long)]
    pub prefix: Option<String>,

    /// API key; disables client-ID / CSRF negotiation
    #[arg(long)]
    pub api_key: Option<String>,

    /// Header carrying the API key
    #[arg(long)]
    pub api_key_header: Option<String>,

    /// Header carrying the server-issued client ID
    #[arg(long)]
    pub client_id_header: Option<String>,

    /// Accept sessions without a CSRF token
    #[arg(long)]
    pub csrf_disable: bool,

    /// Verify server TLS certificates
    #[arg(long)]
    pub verify_tls: bool,

    /// Whole-request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Text prepended to every client log message
    #[arg(long)]
    pub log_prefix: Option<String>,

    /// Base endpoint, e.g. https://127.0.0.1:8384
    pub endpoint: String,

    /// HTTP method
    #[arg(value_enum)]
    pub method: HttpMethod,

    /// Request path, joined to endpoint and prefix
    pub path: String,

    /// Literal request body for post/put
    pub body: Option<String>,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .field("config", &self.config)
            .field("prefix", &self.prefix)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_header", &self.api_key_header)
            .field("client_id_header", &self.client_id_header)
            .field("csrf_disable", &self.csrf_disable)
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .field("log_prefix", &self.log_prefix)
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("body", &self.body)
            .finish()
    }
}

/// Methods supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl Args {
    /// Client log level matching the verbosity flags.
    #[must_use]
    pub fn log_level(&self) -> LogLevel {
        if self.quiet {
            LogLevel::Error
        } else if self.verbose == 0 {
            LogLevel::Info
        } else {
            LogLevel::Debug
        }
    }

    /// Builds the client configuration: the optional file first, then flags.
    ///
    /// The logger always routes into `tracing`.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                serde_json::from_str::<ClientConfig>(&raw)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => ClientConfig::default(),
        };

        if let Some(prefix) = &self.prefix {
            config.url_prefix.clone_from(prefix);
        }
        if self.api_key.is_some() {
            config.api_key.clone_from(&self.api_key);
        }
        if self.api_key_header.is_some() {
            config.api_key_header.clone_from(&self.api_key_header);
        }
        if self.client_id_header.is_some() {
            config.client_id_header.clone_from(&self.client_id_header);
        }
        if self.csrf_disable {
            config.csrf_disable = true;
        }
        if self.verify_tls {
            config.verify_tls = true;
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
        if let Some(prefix) = &self.log_prefix {
            config.log.prefix.clone_from(prefix);
        }
        config.log.level = self.log_level();
        config.log.sink = LogSink::Tracing;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["sessionclient"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_positional_args_parse() {
        let args = parse(&["http://h", "get", "/rest/system/ping"]);
        assert_eq!(args.endpoint, "http://h");
        assert_eq!(args.method, HttpMethod::Get);
        assert_eq!(args.path, "/rest/system/ping");
        assert!(args.body.is_none());
    }

    #[test]
    fn test_cli_body_for_post() {
        let args = parse(&["http://h", "post", "/x", "{\"a\":1}"]);
        assert_eq!(args.method, HttpMethod::Post);
        assert_eq!(args.body.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_cli_unknown_method_rejected() {
        let result = Args::try_parse_from(["sessionclient", "http://h", "patch", "/x"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_missing_path_rejected() {
        let result = Args::try_parse_from(["sessionclient", "http://h", "get"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["sessionclient", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_verbosity_maps_to_log_level() {
        assert_eq!(parse(&["http://h", "get", "/"]).log_level(), LogLevel::Info);
        assert_eq!(
            parse(&["-v", "http://h", "get", "/"]).log_level(),
            LogLevel::Debug
        );
        assert_eq!(
            parse(&["-q", "http://h", "get", "/"]).log_level(),
            LogLevel::Error
        );
    }

    #[test]
    fn test_cli_timeout_zero_rejected() {
        let result =
            Args::try_parse_from(["sessionclient", "--timeout", "0", "http://h", "get", "/"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_debug_output_hides_api_key() {
        let args = parse(&["--api-key", "super-secret", "http://h", "get", "/"]);
        let debug = format!("{args:?}");
        assert!(!debug.contains("super-secret"), "{debug}");
        assert!(debug.contains("[REDACTED]"), "{debug}");
    }

    #[test]
    fn test_client_config_from_flags() {
        let args = parse(&[
            "--prefix",
            "rest",
            "--client-id-header",
            "X-Client-ID",
            "--csrf-disable",
            "--timeout",
            "5",
            "http://h",
            "get",
            "/",
        ]);
        let config = args.client_config().unwrap();
        assert_eq!(config.url_prefix, "rest");
        assert_eq!(config.client_id_header.as_deref(), Some("X-Client-ID"));
        assert!(config.csrf_disable);
        assert!(!config.verify_tls);
        assert_eq!(config.timeout_secs, Some(5));
        assert!(matches!(config.log.sink, LogSink::Tracing));
    }

    #[test]
    fn test_client_config_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"url_prefix":"api","api_key_header":"X-API-Key","api_key":"from-file"}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = parse(&["--config", &path, "--api-key", "from-flag", "http://h", "get", "/"]);
        let config = args.client_config().unwrap();
        assert_eq!(config.url_prefix, "api");
        assert_eq!(config.api_key_header.as_deref(), Some("X-API-Key"));
        assert_eq!(config.api_key.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_client_config_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = parse(&["--config", &path, "http://h", "get", "/"]);
        let err = args.client_config().unwrap_err();
        assert!(err.to_string().contains("invalid config file"), "{err}");
    }
}
