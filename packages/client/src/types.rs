use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method for requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::DELETE => http::Method::DELETE,
            Method::PATCH => http::Method::PATCH,
            Method::HEAD => http::Method::HEAD,
            Method::OPTIONS => http::Method::OPTIONS,
        }
    }
}

impl From<http::Method> for Method {
    fn from(method: http::Method) -> Self {
        match method {
            http::Method::GET => Method::GET,
            http::Method::POST => Method::POST,
            http::Method::PUT => Method::PUT,
            http::Method::DELETE => Method::DELETE,
            http::Method::PATCH => Method::PATCH,
            http::Method::HEAD => Method::HEAD,
            http::Method::OPTIONS => Method::OPTIONS,
            _ => Method::GET, // Default fallback
        }
    }
}

/// Body of a transport response, before decoding.
///
/// Transports that hand back wire text use [`RawBody::Text`]; transports
/// configured to decode on their own hand back [`RawBody::Json`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// Undecoded response text as received from the wire.
    Text(String),
    /// A body the transport already decoded.
    Json(Value),
}

/// Raw result handed back by an executor.
///
/// Read-only input to the decoding step; the pipeline never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response headers with lower-cased names.
    pub headers: HashMap<String, String>,

    /// The undecoded body.
    pub body: RawBody,

    /// The href the transport actually hit, when it knows it.
    pub url: Option<String>,
}

/// A decoded response from a cluster service.
///
/// `body` holds the parsed JSON value, or the original text when the
/// response did not carry JSON. Use [`ClusterResponse::validate`] to
/// re-check the status and unwrap the `{ data: ... }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response headers with lower-cased names.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Decoded response body.
    pub body: Value,

    /// URL the response came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
