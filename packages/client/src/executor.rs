//! HTTP execution abstraction.
//!
//! The pipeline never performs socket I/O itself; it hands the composed
//! request descriptor to an [`HttpExecutor`] and interprets whatever comes
//! back. Production code uses [`ReqwestExecutor`]; tests inject mocks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING};
use reqwest::Client;
use url::Url;

use crate::options::ReqOptions;
use crate::types::{RawBody, RawResponse};

/// Trait for executing HTTP requests.
///
/// Implementations perform one request per call and report its outcome
/// exactly once. Errors are plain messages; classification happens in the
/// pipeline, which attaches the options that produced the failure.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Execute a composed request and return the raw response.
    async fn execute(&self, options: &ReqOptions) -> Result<RawResponse, String>;
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create an executor whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { client })
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, options: &ReqOptions) -> Result<RawResponse, String> {
        let url = Url::parse(&options.url).map_err(|e| e.to_string())?;
        let method: http::Method = options.method.clone().into();

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| e.to_string())?;
            let value = HeaderValue::try_from(value.as_str()).map_err(|e| e.to_string())?;
            headers.insert(name, value);
        }

        let mut builder = self.client.request(method, url).headers(headers);
        if options.json {
            builder = builder.header(ACCEPT, "application/json");
        }
        if !options.gzip {
            // reqwest negotiates gzip on its own when allowed to
            builder = builder.header(ACCEPT_ENCODING, "identity");
        }
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let mut resp_headers = std::collections::HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                resp_headers.insert(name.to_string(), v.to_string());
            }
        }
        let text = response.text().await.map_err(|e| e.to_string())?;

        Ok(RawResponse {
            status,
            headers: resp_headers,
            body: RawBody::Text(text),
            url: Some(final_url),
        })
    }
}
