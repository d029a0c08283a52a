//! scriptsync
//!
//! A Rust library for synchronizing a locally-desired set of script files
//! with a remotely-stored project. Every outbound call goes through a
//! cache-coherent request executor; merges run under an explicit collision
//! strategy; paginated list endpoints are aggregated transparently.

pub mod app;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{Result, SyncError};
