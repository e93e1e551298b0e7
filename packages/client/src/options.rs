//! Request option layers and their composition.
//!
//! A request descriptor is built from three layers, later layers winning
//! on conflict: the client's construction-time defaults, the per-call URL
//! and headers, and the caller's overrides. Keys the pipeline does not
//! know about pass through to the executor untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Method;

/// One layer of request options.
///
/// Every field is optional; unset fields leave the lower layers alone.
/// Unknown keys land in `extra` and are carried through composition
/// without interpretation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallOptions {
    /// Replace the request URL outright.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,

    /// Headers merged key-shallow over lower layers.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Ask for JSON handling of request and response bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,

    /// Ask for compressed transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gzip: Option<bool>,

    /// Request body; object bodies merge recursively across layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Query parameters merged key-shallow over lower layers.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub query: HashMap<String, String>,

    /// Passthrough keys for the executor.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hard-coded baseline every client starts from.
    pub(crate) fn baseline() -> Self {
        Self {
            method: Some(Method::GET),
            json: Some(true),
            gzip: Some(true),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = Some(json);
        self
    }

    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = Some(gzip);
        self
    }

    pub fn with_body(mut self, body: impl Serialize) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Merge `other` over this layer, `other` winning on conflict.
    pub fn merged(mut self, other: &CallOptions) -> Self {
        if other.url.is_some() {
            self.url = other.url.clone();
        }
        if other.method.is_some() {
            self.method = other.method.clone();
        }
        self.headers
            .extend(other.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        if other.json.is_some() {
            self.json = other.json;
        }
        if other.gzip.is_some() {
            self.gzip = other.gzip;
        }
        if let Some(body) = &other.body {
            merge_option_value(&mut self.body, body);
        }
        self.query
            .extend(other.query.iter().map(|(k, v)| (k.clone(), v.clone())));
        merge_map(&mut self.extra, &other.extra);
        self
    }
}

/// The fully composed request descriptor handed to an executor.
///
/// `url` is always absolute. Discarded once the call completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReqOptions {
    pub url: String,
    pub method: Method,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    pub json: bool,
    pub gzip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub query: HashMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReqOptions {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: Method::GET,
            headers: HashMap::new(),
            json: false,
            gzip: false,
            body: None,
            query: HashMap::new(),
            extra: Map::new(),
        }
    }

    fn apply(&mut self, layer: &CallOptions) {
        if let Some(url) = &layer.url {
            self.url = url.clone();
        }
        if let Some(method) = &layer.method {
            self.method = method.clone();
        }
        self.headers
            .extend(layer.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(json) = layer.json {
            self.json = json;
        }
        if let Some(gzip) = layer.gzip {
            self.gzip = gzip;
        }
        if let Some(body) = &layer.body {
            merge_option_value(&mut self.body, body);
        }
        self.query
            .extend(layer.query.iter().map(|(k, v)| (k.clone(), v.clone())));
        merge_map(&mut self.extra, &layer.extra);
    }
}

/// Compose the final request descriptor from the three option layers.
///
/// Merge order, later wins: `defaults` → `{url, headers}` → `overrides`.
/// Purely structural; malformed values surface later as transport or
/// decode failures.
pub fn compose_options(
    defaults: &CallOptions,
    url: &str,
    headers: &HashMap<String, String>,
    overrides: &CallOptions,
) -> ReqOptions {
    let mut options = ReqOptions::new(url);
    options.apply(defaults);
    options
        .headers
        .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
    options.apply(overrides);
    options
}

/// Recursively merge `src` into `dst`: objects merge key-wise, everything
/// else is replaced.
fn deep_merge(dst: &mut Value, src: &Value) {
    match (dst, src) {
        (Value::Object(dst), Value::Object(src)) => merge_map(dst, src),
        (dst, src) => *dst = src.clone(),
    }
}

fn merge_map(dst: &mut Map<String, Value>, src: &Map<String, Value>) {
    for (key, value) in src {
        match dst.get_mut(key) {
            Some(slot) => deep_merge(slot, value),
            None => {
                dst.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_option_value(dst: &mut Option<Value>, src: &Value) {
    match dst {
        Some(slot) => deep_merge(slot, src),
        None => *dst = Some(src.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn baseline_fields_survive_composition() {
        let defaults = CallOptions::baseline();
        let options = compose_options(&defaults, "http://a:80/", &HashMap::new(), &CallOptions::new());
        assert_eq!(options.url, "http://a:80/");
        assert_eq!(options.method, Method::GET);
        assert!(options.json);
        assert!(options.gzip);
        assert!(options.headers.is_empty());
    }

    #[test]
    fn overrides_win_over_defaults() {
        let defaults = CallOptions::baseline().merged(&CallOptions::new().with_gzip(false));
        let overrides = CallOptions::new()
            .with_method(Method::POST)
            .with_json(false);
        let options = compose_options(&defaults, "http://a:80/", &HashMap::new(), &overrides);
        assert_eq!(options.method, Method::POST);
        assert!(!options.json);
        assert!(!options.gzip);
    }

    #[test]
    fn header_layers_all_present_with_override_precedence() {
        let defaults =
            CallOptions::baseline().merged(&CallOptions::new().with_header("x-a", "default"));
        let headers = header_map(&[("x-a", "call"), ("x-b", "call")]);
        let overrides = CallOptions::new().with_header("x-b", "override");
        let options = compose_options(&defaults, "http://a:80/", &headers, &overrides);
        assert_eq!(options.headers.get("x-a"), Some(&"call".to_string()));
        assert_eq!(options.headers.get("x-b"), Some(&"override".to_string()));
    }

    #[test]
    fn extra_keys_merge_recursively() {
        let defaults = CallOptions::baseline()
            .merged(&CallOptions::new().with_extra("agent", json!({"pool": {"size": 4}, "keepalive": true})));
        let overrides = CallOptions::new().with_extra("agent", json!({"pool": {"timeout": 5}}));
        let options = compose_options(&defaults, "http://a:80/", &HashMap::new(), &overrides);
        assert_eq!(
            options.extra.get("agent"),
            Some(&json!({"pool": {"size": 4, "timeout": 5}, "keepalive": true}))
        );
    }

    #[test]
    fn object_bodies_merge_recursively() {
        let defaults = CallOptions::baseline()
            .merged(&CallOptions::new().with_json_body(json!({"a": 1, "nested": {"x": 1}})));
        let overrides = CallOptions::new().with_json_body(json!({"nested": {"y": 2}}));
        let options = compose_options(&defaults, "http://a:80/", &HashMap::new(), &overrides);
        assert_eq!(
            options.body,
            Some(json!({"a": 1, "nested": {"x": 1, "y": 2}}))
        );
    }

    #[test]
    fn scalar_body_is_replaced() {
        let defaults =
            CallOptions::baseline().merged(&CallOptions::new().with_json_body(json!({"a": 1})));
        let overrides = CallOptions::new().with_json_body(json!("text"));
        let options = compose_options(&defaults, "http://a:80/", &HashMap::new(), &overrides);
        assert_eq!(options.body, Some(json!("text")));
    }

    #[test]
    fn override_url_wins() {
        let overrides = CallOptions {
            url: Some("http://elsewhere:9000/".to_string()),
            ..CallOptions::new()
        };
        let options = compose_options(
            &CallOptions::baseline(),
            "http://a:80/",
            &HashMap::new(),
            &overrides,
        );
        assert_eq!(options.url, "http://elsewhere:9000/");
    }

    #[test]
    fn merged_keeps_unset_fields() {
        let merged = CallOptions::baseline().merged(&CallOptions::new());
        assert_eq!(merged.method, Some(Method::GET));
        assert_eq!(merged.json, Some(true));
        assert_eq!(merged.gzip, Some(true));
    }
}
