//! Shared fixtures for integration tests: socket guard and a mock backend
//! speaking the client-ID / CSRF cookie convention.

#![allow(dead_code)]

pub mod socket_guard;

use sessionclient_core::{ClientConfig, LogConfig, LogLevel, LogSink};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Header the mock backend uses to announce the client ID.
pub const CLIENT_ID_HEADER: &str = "ClientID";

/// Client ID issued by the mock backend.
pub const CLIENT_ID: &str = "abc123";

/// CSRF token issued by the mock backend.
pub const CSRF_TOKEN: &str = "tok1";

/// Cookie-mode configuration with the `rest` prefix.
pub fn session_config() -> ClientConfig {
    ClientConfig {
        url_prefix: "rest".to_string(),
        client_id_header: Some(CLIENT_ID_HEADER.to_string()),
        log: quiet_log(),
        ..ClientConfig::default()
    }
}

/// API-key configuration with the `rest` prefix.
pub fn api_key_config(key: &str) -> ClientConfig {
    ClientConfig {
        url_prefix: "rest".to_string(),
        api_key_header: Some("X-API-Key".to_string()),
        api_key: Some(key.to_string()),
        client_id_header: Some(CLIENT_ID_HEADER.to_string()),
        log: quiet_log(),
        ..ClientConfig::default()
    }
}

fn quiet_log() -> LogConfig {
    LogConfig {
        sink: LogSink::Stderr,
        level: LogLevel::Panic,
        prefix: String::new(),
    }
}

/// 200 response announcing `client_id` and setting its CSRF cookie to `token`.
pub fn session_response(client_id: &str, token: &str) -> ResponseTemplate {
    session_response_with_status(200, client_id, token)
}

/// Like [`session_response`] with an arbitrary status.
pub fn session_response_with_status(status: u16, client_id: &str, token: &str) -> ResponseTemplate {
    let scope: String = client_id.chars().take(5).collect();
    ResponseTemplate::new(status)
        .insert_header(CLIENT_ID_HEADER, client_id)
        .insert_header("set-cookie", format!("CSRF-Token-{scope}={token}; Path=/").as_str())
        .set_body_string("ok")
}

/// Mounts the bootstrap root (`GET /`) issuing [`CLIENT_ID`] and [`CSRF_TOKEN`],
/// expecting exactly `hits` calls.
pub async fn mount_session_root(server: &MockServer, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(session_response(CLIENT_ID, CSRF_TOKEN))
        .expect(hits)
        .mount(server)
        .await;
}
