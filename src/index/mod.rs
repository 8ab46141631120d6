//! Interval codec and record identifiers.

pub mod epoch;
pub mod feed_id;
pub mod hasher;

pub use epoch::{Epoch, INDEX_SIZE, MAX_LEVEL, TIME_BITS};
pub use feed_id::{topic_hash, FeedId, ID_PREIMAGE_SIZE};
pub use hasher::{HashAlgorithm, HashContext, HasherPool, PooledHasher};
