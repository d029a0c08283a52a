//! Test support: a scripted `Fetcher`
//!
//! Used by this crate's own tests and available to embedders who want to
//! exercise their sync flows without a network. The mock replays a queue of
//! envelopes in order and records every exchange it was asked to perform.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use reqwest::Method;
use url::Url;

use crate::app::client::{Fetcher, RequestOptions};
use crate::app::envelope::{ErrorInfo, ResponseEnvelope};

/// One exchange the mock was asked to perform
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: Url,
    pub method: Method,
    pub payload: Option<String>,
    pub content_type: Option<String>,
}

/// Scripted fetcher replaying queued envelopes in order
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    queue: Arc<Mutex<VecDeque<ResponseEnvelope>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockFetcher {
    /// Create a mock with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next envelope to replay
    pub fn enqueue(&self, envelope: ResponseEnvelope) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(envelope);
    }

    /// Every exchange performed so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Fetcher for MockFetcher {
    fn execute<'a>(
        &'a self,
        url: &'a Url,
        options: &'a RequestOptions,
    ) -> BoxFuture<'a, ResponseEnvelope> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                url: url.clone(),
                method: options.method.clone(),
                payload: options.payload.clone(),
                content_type: options.content_type.clone(),
            });

        let next = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                ResponseEnvelope::error(599, ErrorInfo::new("mock fetcher script exhausted"))
            });

        Box::pin(async move { next })
    }
}
