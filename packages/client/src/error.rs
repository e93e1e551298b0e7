//! Errors raised by the request and validation pipeline.

use serde_json::Value;

use crate::options::ReqOptions;

/// A classified, call-scoped failure.
///
/// Every variant carries enough context to diagnose the failure without
/// re-issuing the request. Nothing is retried or suppressed; each failure
/// reaches the caller exactly once.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The transport collaborator failed before a response was available.
    #[error("{message}")]
    Transport {
        message: String,
        /// The composed options that produced the failure.
        options: Box<ReqOptions>,
    },

    /// The body claimed JSON but could not be parsed.
    #[error("Can't parse json: {body}")]
    Parse { body: String, status: u16 },

    /// The body decoded to JSON `null`.
    #[error("Can't decode response body: {body}")]
    Decode { body: String, status: u16 },

    /// The service answered with a status outside `200..=299`.
    #[error("{message}")]
    Validation {
        message: String,
        status: u16,
        body: Value,
    },

    /// The response object itself was missing or of unexpected shape.
    #[error("Invalid response: {value}")]
    MalformedResponse { value: Value },
}

impl Error {
    /// Status code associated with the failure, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { .. } => None,
            Error::Parse { status, .. }
            | Error::Decode { status, .. }
            | Error::Validation { status, .. } => Some(*status),
            Error::MalformedResponse { .. } => Some(500),
        }
    }

    /// The response body attached to the failure, when one exists.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Error::Validation { body, .. } => Some(body),
            _ => None,
        }
    }
}
