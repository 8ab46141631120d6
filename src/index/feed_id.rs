//! Record identifiers — binding a feed topic to one epoch.

use crate::index::epoch::{Epoch, INDEX_SIZE};
use crate::index::hasher::HasherPool;
use crate::types::{Digest, LookupError, LookupResult, HASH_SIZE};

/// Size of the buffer hashed into an identifier: topic hash then epoch index.
pub const ID_PREIMAGE_SIZE: usize = HASH_SIZE + INDEX_SIZE;

/// Hash a raw topic. Empty topics do not name a feed.
pub fn topic_hash(pool: &HasherPool, topic: &[u8]) -> LookupResult<Digest> {
    if topic.is_empty() {
        return Err(LookupError::InvalidTopic("topic is empty".to_string()));
    }
    Ok(pool.digest(&[topic]))
}

/// The (topic hash, epoch) pair naming one node of a feed's interval tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedId {
    topic: Digest,
    epoch: Epoch,
}

impl FeedId {
    /// Hash `topic` and pair it with `epoch`.
    pub fn new(pool: &HasherPool, topic: &[u8], epoch: Epoch) -> LookupResult<Self> {
        Ok(Self::from_topic_hash(topic_hash(pool, topic)?, epoch))
    }

    /// Pair an already hashed topic with `epoch`; used to avoid rehashing the
    /// topic on every step of a search.
    pub fn from_topic_hash(topic: Digest, epoch: Epoch) -> Self {
        Self { topic, epoch }
    }

    pub fn topic_hash(&self) -> &Digest {
        &self.topic
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The 41-byte preimage: topic hash followed by the 9-byte epoch index.
    pub fn preimage(&self) -> [u8; ID_PREIMAGE_SIZE] {
        let mut b = [0u8; ID_PREIMAGE_SIZE];
        b[..HASH_SIZE].copy_from_slice(&self.topic.0);
        b[HASH_SIZE..].copy_from_slice(&self.epoch.index());
        b
    }

    /// Record identifier: H(topic hash || index).
    pub fn identifier(&self, pool: &HasherPool) -> Digest {
        pool.digest(&[&self.preimage()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::HashAlgorithm;

    fn pool() -> HasherPool {
        HasherPool::new(HashAlgorithm::Blake3, 2)
    }

    #[test]
    fn test_preimage_layout() {
        let pool = pool();
        let epoch = Epoch::new(1 << 30, 2).unwrap();
        let id = FeedId::new(&pool, b"testtopic", epoch).unwrap();
        let pre = id.preimage();
        assert_eq!(pre.len(), 41);
        assert_eq!(&pre[..32], blake3::hash(b"testtopic").as_bytes());
        assert_eq!(&pre[32..], &epoch.index());
    }

    #[test]
    fn test_identifier_is_hash_of_preimage() {
        let pool = pool();
        let id = FeedId::new(&pool, b"testtopic", Epoch::root()).unwrap();
        assert_eq!(
            id.identifier(&pool).0,
            *blake3::hash(&id.preimage()).as_bytes()
        );
    }

    #[test]
    fn test_distinct_epochs_distinct_identifiers() {
        let pool = pool();
        let a = FeedId::new(&pool, b"t", Epoch::new(0, 1).unwrap()).unwrap();
        let b = FeedId::new(&pool, b"t", Epoch::new(0, 2).unwrap()).unwrap();
        assert_ne!(a.identifier(&pool), b.identifier(&pool));
    }

    #[test]
    fn test_empty_topic_rejected() {
        let pool = pool();
        assert!(matches!(
            FeedId::new(&pool, b"", Epoch::root()),
            Err(LookupError::InvalidTopic(_))
        ));
    }
}
