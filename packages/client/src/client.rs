//! The cluster request client.
//!
//! Composition, invocation, and validation in one pipeline: caller →
//! URL resolution → option composition → executor → decode → validate.
//! A failure at any stage is terminal for that call; nothing is retried.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::Error;
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::options::{compose_options, CallOptions, ReqOptions};
use crate::response;
use crate::types::ClusterResponse;
use crate::url::resolve_url;

/// Port assumed for hosts that do not name one.
const DEFAULT_PORT: u16 = 80;

/// Client for HTTP requests to services inside the cluster.
///
/// Configuration is fixed at construction and shared immutably by every
/// call, so concurrent calls never interfere with each other.
///
/// # Example
///
/// ```ignore
/// use std::collections::HashMap;
/// use cluster_client::{CallOptions, ClusterClient};
///
/// let client = ClusterClient::new().default_port(8080);
///
/// let response = client
///     .request("geos-api", "/geos", CallOptions::new(), HashMap::new())
///     .await?;
/// assert_eq!(response.status, 200);
///
/// // Unwrap the `{ data: ... }` envelope
/// let geos = response.validate()?;
/// ```
pub struct ClusterClient {
    executor: Arc<dyn HttpExecutor>,
    default_port: u16,
    defaults: CallOptions,
}

impl ClusterClient {
    /// Create a client backed by the reqwest executor.
    pub fn new() -> Self {
        Self::with_executor(Arc::new(ReqwestExecutor::new()))
    }

    /// Create a client that performs its transport through `executor`.
    pub fn with_executor(executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            executor,
            default_port: DEFAULT_PORT,
            defaults: CallOptions::baseline(),
        }
    }

    /// Set the port assumed for hosts without an explicit one.
    pub fn default_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    /// Merge request option defaults applied to every call.
    pub fn default_options(mut self, defaults: CallOptions) -> Self {
        self.defaults = CallOptions::baseline().merged(&defaults);
        self
    }

    /// Resolve `host` and `path` into a URL and run the full pipeline.
    pub async fn request(
        &self,
        host: &str,
        path: &str,
        options: CallOptions,
        headers: HashMap<String, String>,
    ) -> Result<ClusterResponse, Error> {
        let url = resolve_url(host, path, self.default_port);
        self.request_url(&url, options, headers).await
    }

    /// Run the full pipeline against an absolute URL.
    ///
    /// Resolves with the decoded response after its status checks out;
    /// the `{ data: ... }` envelope stays intact until
    /// [`ClusterResponse::validate`] is called.
    pub async fn request_url(
        &self,
        url: &str,
        options: CallOptions,
        headers: HashMap<String, String>,
    ) -> Result<ClusterResponse, Error> {
        let req_options = compose_options(&self.defaults, url, &headers, &options);
        trace!(options = ?req_options, "composed request options");

        let raw = match self.executor.execute(&req_options).await {
            Ok(raw) => raw,
            Err(message) => {
                return Err(Error::Transport {
                    message,
                    options: Box::new(req_options),
                });
            }
        };
        trace!(status = raw.status, url = %req_options.url, "response received");

        if req_options.gzip && !gzip_encoded(&raw.headers) {
            debug!(url = %req_options.url, "no gzip encoded response");
        }

        let content_type = raw.headers.get("content-type").map(String::as_str);
        let body = response::decode_body(&raw.body, content_type, raw.status)?;

        let result = ClusterResponse {
            status: raw.status,
            body,
            url: raw.url.clone().or_else(|| Some(req_options.url.clone())),
            headers: raw.headers,
        };
        response::validate_body(result.status, &result.body, result.url.as_deref())?;
        Ok(result)
    }

    /// Compose the request descriptor without executing it.
    pub fn prepare(
        &self,
        host: &str,
        path: &str,
        options: CallOptions,
        headers: HashMap<String, String>,
    ) -> ReqOptions {
        let url = resolve_url(host, path, self.default_port);
        compose_options(&self.defaults, &url, &headers, &options)
    }

    /// Validate an already-fetched response value and unwrap its body.
    ///
    /// See [`crate::response::validate_response`].
    pub fn validate_response(&self, response: &Value) -> Result<Value, Error> {
        response::validate_response(response)
    }
}

impl Default for ClusterClient {
    fn default() -> Self {
        Self::new()
    }
}

fn gzip_encoded(headers: &HashMap<String, String>) -> bool {
    headers
        .get("content-encoding")
        .is_some_and(|encoding| encoding.contains("gzip"))
}
