//! Prelude module for scriptsync
//!
//! Re-exports the most commonly used items from the library, providing a
//! convenient way to import everything needed for typical usage with a
//! single `use scriptsync::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use scriptsync::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let fetcher = Arc::new(HttpFetcher::new()?);
//! let executor = RequestExecutor::new(fetcher, CacheGateway::new(Arc::new(MemoryStore::new())));
//! let content = ProjectContentService::new(executor)?;
//! let reconciler = ContentReconciler::new(content);
//! // Continue with reconciler.push(...)
//! # Ok(())
//! # }
//! ```

// Core result types
pub use crate::errors::{ConfigError, EnvelopeError, Result, SyncError};

// Essential components
pub use crate::app::{
    CacheGateway,
    CacheStore,
    ClientConfig,
    CollisionStrategy,
    ContentReconciler,
    ErrorInfo,
    Fetcher,
    File,
    FileKey,
    FileType,
    GetContentOptions,
    HttpFetcher,
    MemoryStore,
    PaginatedCollector,
    ProjectContentService,
    ReconcileOptions,
    RequestExecutor,
    RequestOptions,
    ResponseEnvelope,
};

// Commonly used constants
pub use crate::constants::{DEFAULT_TTL, MANIFEST_NAME, PAGE_SIZE};

// Standard library re-exports that are commonly needed
pub use std::sync::Arc;
pub use std::time::Duration;
