//! Cache Module
//!
//! Embedded key-value cache with per-entry TTL. Backs the in-process
//! verification store.

mod entry;
mod store;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 4 * 1024;
