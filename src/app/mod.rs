//! Core library components
//!
//! This module contains the content reconciliation engine and everything it
//! depends on: the normalized response envelope, the cache gateway, the
//! cache-coherent request executor, the typed content service, and the
//! pagination aggregator.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scriptsync::app::{
//!     CacheGateway, CollisionStrategy, ContentReconciler, File, FileType, HttpFetcher,
//!     MemoryStore, ProjectContentService, ReconcileOptions, RequestExecutor,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Arc::new(HttpFetcher::new()?);
//! let cache = CacheGateway::new(Arc::new(MemoryStore::new()));
//! let executor = RequestExecutor::new(fetcher, cache);
//! let reconciler = ContentReconciler::new(ProjectContentService::new(executor)?);
//!
//! let desired = vec![File::new("main", FileType::ServerJs, "function f() {}")];
//! let options = ReconcileOptions {
//!     strategy: CollisionStrategy::Replace,
//!     ..Default::default()
//! };
//! let outcome = reconciler.push("script-id", desired, &options).await?;
//! outcome.check()?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod content;
pub mod envelope;
pub mod executor;
pub mod models;
pub mod pages;
pub mod reconcile;
pub mod testing;

// Re-export main public API
pub use cache::{CacheGateway, CacheStore, MemoryStore};
pub use client::{ClientConfig, Fetcher, HttpFetcher, RequestOptions};
pub use content::{GetContentOptions, ProjectContentService};
pub use envelope::{ErrorInfo, ResponseEnvelope};
pub use executor::RequestExecutor;
pub use models::{CollisionStrategy, File, FileKey, FileType};
pub use pages::PaginatedCollector;
pub use reconcile::{merge_file_sets, ContentReconciler, MergeOutcome, ReconcileOptions};
