//! Status-code policy: maps a response to success or a typed error.

use reqwest::StatusCode;
use serde_json::Value;

use super::error::ClientError;

/// Classifies a response by status code and body.
///
/// | Status | Result |
/// |---|---|
/// | 200 | `Ok(())` |
/// | 401 | [`ClientError::InvalidCredentials`] |
/// | 403 | [`ClientError::InvalidApiKey`] in API-key mode, else [`ClientError::InvalidCsrf`] |
/// | 404 | [`ClientError::InvalidEndpoint`] |
/// | other | [`ClientError::Remote`] or [`ClientError::UnknownStatus`], see below |
///
/// For other statuses the message is the string `error` field of a JSON
/// object body, or else the trimmed body text. An empty message yields
/// [`ClientError::UnknownStatus`] carrying the status line.
///
/// The 403 session refresh is not triggered here; the pipeline reacts to
/// [`ClientError::InvalidCsrf`].
///
/// # Errors
///
/// Every status other than 200.
pub fn classify_status(
    status: StatusCode,
    body: &[u8],
    api_key_mode: bool,
) -> Result<(), ClientError> {
    match status.as_u16() {
        200 => Ok(()),
        401 => Err(ClientError::InvalidCredentials),
        403 if api_key_mode => Err(ClientError::InvalidApiKey),
        403 => Err(ClientError::InvalidCsrf),
        404 => Err(ClientError::InvalidEndpoint),
        code => Err(remote_error(code, &status.to_string(), body)),
    }
}

fn remote_error(code: u16, status_text: &str, body: &[u8]) -> ClientError {
    let message = match json_error_field(body) {
        Some(message) => message,
        None => String::from_utf8_lossy(body).trim().to_string(),
    };
    if message.is_empty() {
        ClientError::unknown_status(code, status_text)
    } else {
        ClientError::remote(code, message)
    }
}

/// Extracts the string `error` field from a JSON object body.
///
/// An empty string is returned as is, so `{"error":""}` reads like an empty body.
fn json_error_field(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(mut map) => match map.remove("error")? {
            Value::String(message) => Some(message),
            _ => None,
        },
        _ => None,
    }
}
