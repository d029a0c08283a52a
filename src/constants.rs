//! Application constants for scriptsync
//!
//! This module centralizes all constants used throughout the library,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Remote API endpoints and wire-format constants
pub mod api {
    /// Base URL of the script project API
    pub const BASE_URL: &str = "https://script.googleapis.com/v1";

    /// Projects collection resource
    pub const PROJECTS_RESOURCE: &str = "projects";

    /// Content sub-resource of a project
    pub const CONTENT_RESOURCE: &str = "content";

    /// Deployments sub-resource of a project
    pub const DEPLOYMENTS_RESOURCE: &str = "deployments";

    /// Fixed page size for paginated list endpoints
    ///
    /// Not caller-tunable: list endpoints always request this many entries
    /// per page and follow `nextPageToken` until exhausted.
    pub const PAGE_SIZE: u32 = 100;

    /// Query parameter carrying the pagination cursor
    pub const PAGE_TOKEN_PARAM: &str = "pageToken";

    /// Query parameter carrying the page size
    pub const PAGE_SIZE_PARAM: &str = "pageSize";

    /// Query parameter pinning a content fetch to a version
    pub const VERSION_PARAM: &str = "versionNumber";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "scriptsync/0.1.0";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;

    /// JSON content type attached to structured request bodies
    pub const JSON_CONTENT_TYPE: &str = "application/json";
}

/// Response cache configuration constants
pub mod cache {
    use super::Duration;

    /// Default time-to-live for cached GET responses
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

    /// Initial capacity of the in-memory store
    pub const INITIAL_CAPACITY: usize = 32;
}

/// Script file constants
pub mod files {
    /// Name of the distinguished project manifest file
    pub const MANIFEST_NAME: &str = "appsscript";

    /// Separator used when the rename strategy derives a fresh name
    pub const RENAME_SEPARATOR: char = '_';
}

// Re-export commonly used constants for convenience
pub use api::{BASE_URL, PAGE_SIZE};
pub use cache::DEFAULT_TTL;
pub use files::MANIFEST_NAME;
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
