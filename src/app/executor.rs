//! Cache-coherent request executor
//!
//! This module owns every cache decision the library makes. The rules, in
//! dispatch order:
//!
//! - the cache key is the exact request URL, query string included, so
//!   paginated requests cache independently per page;
//! - a non-GET request invalidates its key *before* dispatch, regardless of
//!   outcome, so no stale entry can survive an attempted write (at the cost
//!   of an occasional unnecessary miss later);
//! - a GET without `no_cache` reads through the cache and returns a hit
//!   without touching the network;
//! - only a *successful* GET miss is written back; failed responses and
//!   non-GET responses are never cached.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use tracing::{debug, warn};
use url::Url;

use crate::app::cache::CacheGateway;
use crate::app::client::{Fetcher, RequestOptions};
use crate::app::envelope::{ErrorInfo, ResponseEnvelope};
use crate::constants::cache;

/// Issues one logical HTTP request through the cache and the fetcher
#[derive(Clone)]
pub struct RequestExecutor {
    fetcher: Arc<dyn Fetcher>,
    cache: CacheGateway,
    default_ttl: Duration,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("cache", &self.cache)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl RequestExecutor {
    /// Create an executor over a fetcher and a cache gateway
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: CacheGateway) -> Self {
        Self {
            fetcher,
            cache,
            default_ttl: cache::DEFAULT_TTL,
        }
    }

    /// Create an executor with caching disabled
    pub fn without_cache(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::new(fetcher, CacheGateway::disabled())
    }

    /// Set the TTL used when a request does not specify one
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Execute one logical request
    ///
    /// Returns the normalized envelope in every case; transport failures
    /// arrive as `success = false` envelopes, never as errors.
    pub async fn execute(&self, url: &Url, options: RequestOptions) -> ResponseEnvelope {
        let key = url.as_str();

        if options.method != Method::GET {
            // Invalidate before dispatch, unconditionally. Even a failed
            // write attempt must not leave a stale entry behind.
            self.cache.remove(key);
        } else if !options.no_cache {
            if let Some(hit) = self.cache.get(key) {
                debug!("served from cache: {}", key);
                return hit;
            }
        }

        let options = match encode_body(options) {
            Ok(options) => options,
            Err(envelope) => return envelope,
        };

        let mut envelope = self.fetcher.execute(url, &options).await;
        envelope.cached = false;

        if options.method == Method::GET && !options.no_cache && envelope.success {
            let ttl = options.cache_ttl.unwrap_or(self.default_ttl);
            self.cache.put(key, &envelope, ttl);
        }

        envelope
    }
}

/// Serialize a structured POST/PUT body to JSON and mark the content type
///
/// GET (and other bodiless) requests pass through untouched. An encoding
/// failure is returned as a failed envelope so it travels as data like every
/// other non-config failure.
fn encode_body(mut options: RequestOptions) -> Result<RequestOptions, ResponseEnvelope> {
    let has_structured_body = options.body.is_some()
        && (options.method == Method::POST || options.method == Method::PUT);
    if !has_structured_body {
        return Ok(options);
    }

    let body = options.body.take().unwrap_or_default();
    match serde_json::to_string(&body) {
        Ok(payload) => {
            options.payload = Some(payload);
            options.content_type = Some(crate::constants::http::JSON_CONTENT_TYPE.to_string());
            Ok(options)
        }
        Err(e) => {
            warn!("failed to encode request body: {}", e);
            Err(ResponseEnvelope::error(
                0,
                ErrorInfo::new(format!("failed to encode request body: {e}")),
            ))
        }
    }
}
