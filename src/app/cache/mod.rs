//! Response cache layer
//!
//! This module contains the [`CacheStore`] capability trait, the
//! [`CacheGateway`] the request executor talks to, and a default in-memory
//! store. The gateway decides nothing about HTTP semantics; it only wraps an
//! optional backing store so that callers never branch on "is caching
//! configured".

mod memory;

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::app::envelope::ResponseEnvelope;

pub use memory::MemoryStore;

/// Keyed envelope store with per-entry TTL
///
/// Implementations own entry lifecycle and expiry enforcement; the core only
/// decides when to read, write, or evict. The surface is infallible:
/// implementations must swallow and log their own I/O problems rather than
/// surface them into request handling.
pub trait CacheStore: Send + Sync {
    /// Look up the entry for `key`, absent if missing or expired
    ///
    /// Present/absent is explicit: a stored failed envelope would still be a
    /// hit. (Only successful responses are ever written by this library.)
    fn get(&self, key: &str) -> Option<ResponseEnvelope>;

    /// Store `envelope` under `key` for `ttl`
    fn put(&self, key: &str, envelope: ResponseEnvelope, ttl: Duration);

    /// Evict the entry for `key`, if any
    fn remove(&self, key: &str);
}

/// Gateway between the request executor and an optional cache store
///
/// All operations are no-ops when no backing store was configured
/// (caching-disabled mode) and never fail.
#[derive(Clone)]
pub struct CacheGateway {
    store: Option<Arc<dyn CacheStore>>,
}

impl std::fmt::Debug for CacheGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGateway")
            .field("configured", &self.store.is_some())
            .finish()
    }
}

impl CacheGateway {
    /// Create a gateway over a backing store
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Create a gateway with caching disabled
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Whether a backing store is configured
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Read the entry for `key`, tagging the returned copy `cached = true`
    ///
    /// The stored original is never mutated: the tag is applied to a clone,
    /// so a later hit on the same entry starts from an untagged value.
    pub fn get(&self, key: &str) -> Option<ResponseEnvelope> {
        let store = self.store.as_ref()?;
        let mut envelope = store.get(key)?;
        trace!(key, "cache hit");
        envelope.cached = true;
        Some(envelope)
    }

    /// Store `envelope` under `key` for `ttl`
    pub fn put(&self, key: &str, envelope: &ResponseEnvelope, ttl: Duration) {
        if let Some(store) = &self.store {
            trace!(key, ttl_secs = ttl.as_secs(), "cache write");
            store.put(key, envelope.clone(), ttl);
        }
    }

    /// Evict the entry for `key`
    pub fn remove(&self, key: &str) {
        if let Some(store) = &self.store {
            trace!(key, "cache invalidate");
            store.remove(key);
        }
    }
}
