//! # cluster-client
//!
//! HTTP requests to services inside a cluster, normalized into a single
//! validated shape.
//!
//! Services are addressed by logical host name and share a default port;
//! responses are decoded as JSON, classified by status code, and unwrapped
//! from the `{ data: ... }` envelope some services use.
//!
//! ## Usage model
//!
//! ```text
//! 1. Build a client once; defaults are fixed at construction:
//!    let client = ClusterClient::new().default_port(8080);
//!
//! 2. Issue requests by host + path:
//!    let response = client.request("geos-api", "/geos", options, headers).await?;
//!
//! 3. Unwrap the payload:
//!    let geos = response.validate()?;
//! ```
//!
//! The socket-level transport is an injected collaborator behind the
//! [`HttpExecutor`] trait; [`ReqwestExecutor`] is the production
//! implementation. Every failure — transport, parse, decode, or an
//! out-of-range status — surfaces as a classified [`Error`] carrying the
//! context needed to diagnose it.

pub mod client;
pub mod error;
pub mod executor;
pub mod options;
pub mod response;
pub mod types;
pub mod url;

// Re-export main types
pub use crate::client::ClusterClient;
pub use crate::error::Error;
pub use crate::executor::{HttpExecutor, ReqwestExecutor};
pub use crate::options::{compose_options, CallOptions, ReqOptions};
pub use crate::response::{unwrap_envelope, validate_response};
pub use crate::types::{ClusterResponse, Method, RawBody, RawResponse};
pub use crate::url::resolve_url;
