//! Feed lookup — finding the latest update of an owner-signed feed.
//!
//! Each update of a feed (owner, topic) is an immutable record stored at an
//! address derived from the topic, an epoch of a binary time tree, and the
//! owner. No index or version chain links the records; readers walk the
//! epoch tree, probing derived addresses, to find the update whose epoch
//! most tightly precedes the requested time.

pub mod cli;
pub mod engine;
pub mod envelope;
pub mod index;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use engine::{CancelHandle, FeedLookup, FeedUpdate, LookupContext, SearchMode, SearchReport};
pub use envelope::{AddressScheme, Envelope, RawEnvelope, SingleOwnerScheme};
pub use index::{Epoch, FeedId, HashAlgorithm, HasherPool, MAX_LEVEL};
pub use store::{DirStore, Fetched, Fetcher, Getter, MemoryStore, StoreError};
pub use types::{
    now_secs, Address, Digest, LookupConfig, LookupError, LookupResult, Owner, HASH_SIZE,
};
