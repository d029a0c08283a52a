//! Transport seam: the `Fetcher` capability and its default implementation
//!
//! The core never talks to the network directly; it drives a [`Fetcher`],
//! which performs exactly one HTTP exchange and maps the outcome — including
//! transport failures — into a normalized
//! [`ResponseEnvelope`](crate::app::ResponseEnvelope). Retries, rate limiting
//! and credential handling belong to the fetcher implementation or the layers
//! behind it, never to the core.

mod config;

use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use crate::app::envelope::{ErrorInfo, ResponseEnvelope};
use crate::errors::ConfigResult;

pub use config::ClientConfig;

/// Options for one logical request
///
/// `method` and `body` describe the exchange; `no_cache` and `cache_ttl` are
/// consumed by the request executor and ignored by fetchers. The executor
/// encodes a structured `body` into `payload`/`content_type` before the
/// fetcher ever sees the request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method, GET by default
    pub method: Method,
    /// Structured request payload (POST/PUT), encoded by the executor
    pub body: Option<Value>,
    /// Pre-encoded request body, set by the executor
    pub payload: Option<String>,
    /// Content type of `payload`, set by the executor
    pub content_type: Option<String>,
    /// Skip the cache read for this GET
    pub no_cache: bool,
    /// Cache TTL override for this request
    pub cache_ttl: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            payload: None,
            content_type: None,
            no_cache: false,
            cache_ttl: None,
        }
    }
}

impl RequestOptions {
    /// GET request with default options
    pub fn get() -> Self {
        Self::default()
    }

    /// PUT request with a structured JSON body
    pub fn put(body: Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
            ..Self::default()
        }
    }

    /// POST request with a structured JSON body
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    /// Skip the cache read for this request
    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    /// Override the cache TTL for this request
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }
}

/// Capability performing a single HTTP exchange
///
/// Implementations own verb handling, header assembly, body parsing, and the
/// mapping of transport/status outcomes into `success`. They never panic and
/// never error: a failed exchange is a `success = false` envelope.
pub trait Fetcher: Send + Sync {
    /// Perform one exchange and return the normalized envelope
    fn execute<'a>(
        &'a self,
        url: &'a url::Url,
        options: &'a RequestOptions,
    ) -> BoxFuture<'a, ResponseEnvelope>;
}

/// Default `Fetcher` over a tuned reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with default client configuration
    pub fn new() -> ConfigResult<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a fetcher with custom client configuration
    pub fn with_config(config: &ClientConfig) -> ConfigResult<Self> {
        Ok(Self {
            client: config.build_http_client()?,
        })
    }

    async fn dispatch(&self, url: &url::Url, options: &RequestOptions) -> ResponseEnvelope {
        let mut request = self.client.request(options.method.clone(), url.as_str());
        if let Some(payload) = &options.payload {
            request = request.body(payload.clone());
            if let Some(content_type) = &options.content_type {
                request = request.header(reqwest::header::CONTENT_TYPE, content_type);
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("transport failure for {}: {}", url, e);
                return ResponseEnvelope::error(0, ErrorInfo::new(e.to_string()));
            }
        };

        let status = response.status();
        let headers = header_map(&response);
        let content = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to read response body for {}: {}", url, e);
                return ResponseEnvelope::error(
                    status.as_u16(),
                    ErrorInfo::new(format!("failed to read response body: {e}")),
                )
                .with_headers(headers);
            }
        };

        let (data, parsed) = match serde_json::from_str::<Value>(&content) {
            Ok(value) => (value, true),
            Err(_) => (Value::Null, false),
        };

        debug!(
            "{} {} -> {} ({} bytes, parsed: {})",
            options.method,
            url,
            status,
            content.len(),
            parsed
        );

        let extended = if status.is_success() {
            None
        } else {
            Some(ErrorInfo::new(format!(
                "server responded with HTTP {}",
                status.as_u16()
            )))
        };

        ResponseEnvelope {
            success: status.is_success(),
            data,
            code: status.as_u16(),
            extended,
            parsed,
            headers,
            content,
            cached: false,
            collision: None,
        }
    }
}

impl Fetcher for HttpFetcher {
    fn execute<'a>(
        &'a self,
        url: &'a url::Url,
        options: &'a RequestOptions,
    ) -> BoxFuture<'a, ResponseEnvelope> {
        Box::pin(self.dispatch(url, options))
    }
}

fn header_map(response: &reqwest::Response) -> HashMap<String, String> {
    response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_plain_get() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(!options.no_cache);
        assert!(options.cache_ttl.is_none());
    }

    #[test]
    fn test_put_options_carry_body() {
        let options = RequestOptions::put(serde_json::json!({"files": []}));
        assert_eq!(options.method, Method::PUT);
        assert!(options.body.is_some());
        // Encoding is the executor's job
        assert!(options.payload.is_none());
        assert!(options.content_type.is_none());
    }

    #[test]
    fn test_options_builders() {
        let options = RequestOptions::get()
            .with_no_cache(true)
            .with_cache_ttl(Duration::from_secs(10));
        assert!(options.no_cache);
        assert_eq!(options.cache_ttl, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_http_fetcher_creation() {
        assert!(HttpFetcher::new().is_ok());
    }
}
