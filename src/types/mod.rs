//! Shared value types for the feed lookup library.

pub mod config;
pub mod digest;
pub mod error;
pub mod owner;

pub use config::{LookupConfig, DEFAULT_HASHER_POOL_SIZE, DEFAULT_TIMEOUT_SECS};
pub use digest::{Address, Digest, HASH_SIZE};
pub use error::{LookupError, LookupResult};
pub use owner::{Owner, OWNER_SIZE};

/// Returns the current time as Unix epoch seconds.
pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
