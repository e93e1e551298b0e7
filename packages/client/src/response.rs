//! Response decoding, validation, and envelope unwrapping.
//!
//! Decoding turns a raw transport body into a JSON value, falling back to
//! the original text when the response never claimed to be JSON.
//! Validation classifies the outcome by status code. Unwrapping lets
//! callers receive the inner payload of `{ data: ... }` envelopes without
//! inspecting them.

use serde_json::Value;

use crate::error::Error;
use crate::types::{ClusterResponse, RawBody};

fn status_is_valid(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// True when the content type's media type is JSON, parameters ignored.
fn content_type_is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case("application/json"))
}

fn raw_text(body: &RawBody) -> String {
    match body {
        RawBody::Text(text) => text.clone(),
        RawBody::Json(value) => value.to_string(),
    }
}

/// Decode a raw transport body.
///
/// Text bodies are JSON-parsed; a parse failure is fatal only when the
/// response declared a JSON content type, otherwise the text is kept as
/// the body. A decoded `null` is rejected as undecodable regardless of
/// where it came from.
pub(crate) fn decode_body(
    body: &RawBody,
    content_type: Option<&str>,
    status: u16,
) -> Result<Value, Error> {
    let decoded = match body {
        RawBody::Json(value) => value.clone(),
        RawBody::Text(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(_) if content_type_is_json(content_type) => {
                return Err(Error::Parse {
                    body: text.clone(),
                    status,
                });
            }
            Err(_) => Value::String(text.clone()),
        },
    };
    if decoded.is_null() {
        return Err(Error::Decode {
            body: raw_text(body),
            status,
        });
    }
    Ok(decoded)
}

/// Human-readable reason for an invalid response.
fn invalid_reason(body: &Value) -> String {
    match body {
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        Value::String(text) => text.clone(),
        Value::Null => "Invalid response".to_string(),
        other => other.to_string(),
    }
}

fn invalid_status_error(status: u16, body: &Value, url: Option<&str>) -> Error {
    let mut message = format!("{} ({status})", invalid_reason(body));
    if let Some(url) = url {
        if !url.is_empty() {
            message.push_str(" from ");
            message.push_str(url);
        }
    }
    Error::Validation {
        message,
        status,
        body: body.clone(),
    }
}

/// Check the status code and return the body untouched when valid.
pub(crate) fn validate_body(status: u16, body: &Value, url: Option<&str>) -> Result<Value, Error> {
    if status_is_valid(status) {
        return Ok(body.clone());
    }
    Err(invalid_status_error(status, body, url))
}

/// Unwrap the `{ data: ... }` envelope some cluster services use.
///
/// Objects without a `data` key, arrays, and primitives pass through
/// unchanged.
pub fn unwrap_envelope(body: &Value) -> Value {
    match body {
        Value::Object(map) => match map.get("data") {
            Some(data) => data.clone(),
            None => body.clone(),
        },
        _ => body.clone(),
    }
}

/// Validate an already-fetched response value and unwrap its body.
///
/// Accepts the loose shape `{ statusCode | status, body }`. Anything else
/// — `null`, a bare string, a number — is rejected as malformed with an
/// effective status of 500. A response object without a status code is
/// treated as a 500 as well.
pub fn validate_response(response: &Value) -> Result<Value, Error> {
    let map = match response {
        Value::Object(map) => map,
        other => {
            return Err(Error::MalformedResponse {
                value: other.clone(),
            });
        }
    };
    let status = map
        .get("statusCode")
        .or_else(|| map.get("status"))
        .and_then(Value::as_u64)
        .map(|code| code as u16)
        .unwrap_or(500);
    let body = map.get("body").cloned().unwrap_or(Value::Null);
    let url = map.get("url").and_then(Value::as_str);
    validate_body(status, &body, url).map(|body| unwrap_envelope(&body))
}

impl ClusterResponse {
    /// True when the status code is in `200..=299`.
    pub fn is_success(&self) -> bool {
        status_is_valid(self.status)
    }

    /// Re-check the status and return the unwrapped payload.
    pub fn validate(&self) -> Result<Value, Error> {
        validate_body(self.status, &self.body, self.url.as_deref())
            .map(|body| unwrap_envelope(&body))
    }
}
