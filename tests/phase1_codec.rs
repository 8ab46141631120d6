//! Phase 1 tests: interval codec, identifiers and address derivation.

use feed_lookup::engine::FeedLookup;
use feed_lookup::envelope::{AddressScheme, SingleOwnerScheme};
use feed_lookup::index::{topic_hash, Epoch, FeedId, HashAlgorithm, HasherPool, MAX_LEVEL};
use feed_lookup::store::MemoryStore;
use feed_lookup::types::{Address, Digest, LookupConfig, LookupError, Owner};

use rand::Rng;

fn owner() -> Owner {
    Owner::new([0x11; 20])
}

fn sha256_lookup() -> FeedLookup<MemoryStore> {
    let config = LookupConfig {
        hash: HashAlgorithm::Sha256,
        ..LookupConfig::default()
    };
    FeedLookup::with_config(MemoryStore::new(), config)
}

// ==================== Known-answer Tests ====================

#[test]
fn test_sha256_topic_hash_vector() {
    let pool = HasherPool::new(HashAlgorithm::Sha256, 1);
    let hash = topic_hash(&pool, b"testtopic").unwrap();
    assert_eq!(
        hash.to_hex(),
        "c4728b1efd3237fefce0b1beb262bae2e5facb633c36515de68d8576adb657d9"
    );
}

#[test]
fn test_sha256_identifier_and_address_vectors() {
    let lookup = sha256_lookup();
    let cases = [
        (
            0u64,
            0u8,
            "b3e7b4dcb980118362b2ef90b7e1c197a5c82052bd521d05a45280f4b7dc1276",
            "2603a65456314400398289a56de903d5e0b5ecec90078ad62f93a5e93567acc3",
        ),
        (
            1 << 31,
            1,
            "9dae1c4629c0ec84423bc04e4365456f70798da80c785a0ac34f95ae850a8f82",
            "f45c617a4536c489b2a0d9af4965210567ebb3f593c5e55d17e516d20920981e",
        ),
        (
            1 << 30,
            2,
            "a3eeb664d6cbe7f8ef2482a8937a851bf5586a009ab6a7fbb1f39395aa790c0a",
            "47b69f5678c7b343a1832d96a0426322fa9a62383d56e259f94f6bae68da6b45",
        ),
    ];
    for (anchor, level, identifier, address) in cases {
        let epoch = Epoch::new(anchor, level).unwrap();
        assert_eq!(
            lookup.identifier(b"testtopic", epoch).unwrap(),
            Digest::from_hex(identifier).unwrap()
        );
        assert_eq!(
            lookup.address(&owner(), b"testtopic", epoch).unwrap(),
            Address::from_hex(address).unwrap()
        );
    }
}

#[test]
fn test_keccak256_root_vectors() {
    let config = LookupConfig {
        hash: HashAlgorithm::Keccak256,
        ..LookupConfig::default()
    };
    let lookup = FeedLookup::with_config(MemoryStore::new(), config);
    let epoch = Epoch::root();
    assert_eq!(
        topic_hash(lookup.hasher_pool(), b"testtopic").unwrap().to_hex(),
        "65cf9694019c5d902d773447898b875265abd8c57e6b95e926cf491254e3ad8e"
    );
    assert_eq!(
        lookup.identifier(b"testtopic", epoch).unwrap().to_hex(),
        "11ece954962a80ec61bad8b30280a85cb546f709ed728be76be5ae3ae3221794"
    );
    assert_eq!(
        lookup.address(&owner(), b"testtopic", epoch).unwrap().to_hex(),
        "2d76a4c663687b305f1e890f04ee41b8b8bc845306a5fb756ec6d3f61fb7ffc9"
    );
}

// ==================== Determinism Tests ====================

#[test]
fn test_identifier_deterministic_across_pools() {
    let a = HasherPool::new(HashAlgorithm::Blake3, 0);
    let b = HasherPool::new(HashAlgorithm::Blake3, 8);
    let epoch = Epoch::new(0xC000_0000, 2).unwrap();
    let id_a = FeedId::new(&a, b"feed", epoch).unwrap().identifier(&a);
    for _ in 0..10 {
        let id_b = FeedId::new(&b, b"feed", epoch).unwrap().identifier(&b);
        assert_eq!(id_a, id_b);
    }
}

#[test]
fn test_address_matches_manual_derivation() {
    let lookup = FeedLookup::new(MemoryStore::new());
    let pool = HasherPool::new(HashAlgorithm::Blake3, 1);
    let epoch = Epoch::new(1 << 31, 1).unwrap();
    let identifier = FeedId::new(&pool, b"feed", epoch).unwrap().identifier(&pool);
    let manual = SingleOwnerScheme
        .derive(&pool, &identifier, &owner())
        .unwrap();
    assert_eq!(lookup.address(&owner(), b"feed", epoch).unwrap(), manual);
}

#[test]
fn test_algorithms_disagree() {
    let blake = FeedLookup::new(MemoryStore::new());
    let sha = sha256_lookup();
    let epoch = Epoch::root();
    assert_ne!(
        blake.address(&owner(), b"feed", epoch).unwrap(),
        sha.address(&owner(), b"feed", epoch).unwrap()
    );
}

#[test]
fn test_topics_and_owners_separate_feeds() {
    let lookup = FeedLookup::new(MemoryStore::new());
    let epoch = Epoch::root();
    let base = lookup.address(&owner(), b"feed", epoch).unwrap();
    assert_ne!(base, lookup.address(&owner(), b"feed2", epoch).unwrap());
    assert_ne!(
        base,
        lookup
            .address(&Owner::new([0x22; 20]), b"feed", epoch)
            .unwrap()
    );
}

#[test]
fn test_pool_contexts_recycled() {
    let lookup = FeedLookup::new(MemoryStore::new());
    for level in 0..=MAX_LEVEL {
        lookup
            .address(&owner(), b"feed", Epoch::new(0, level).unwrap())
            .unwrap();
    }
    // Derivations are sequential, so one context serves them all.
    assert_eq!(lookup.hasher_pool().idle(), 1);
}

// ==================== Input Validation Tests ====================

#[test]
fn test_invalid_owner_rejected() {
    assert!(matches!(
        Owner::from_hex("0x1234"),
        Err(LookupError::InvalidIdentity(_))
    ));
    assert!(matches!(
        Owner::from_hex("not hex at all"),
        Err(LookupError::InvalidIdentity(_))
    ));
    let owner: Owner = "0x1111111111111111111111111111111111111111".parse().unwrap();
    assert_eq!(owner, Owner::new([0x11; 20]));
    assert_eq!(owner.to_string(), "0x1111111111111111111111111111111111111111");
}

#[test]
fn test_empty_topic_rejected_before_hashing() {
    let lookup = FeedLookup::new(MemoryStore::new());
    assert!(matches!(
        lookup.address(&owner(), b"", Epoch::root()),
        Err(LookupError::InvalidTopic(_))
    ));
}

#[test]
fn test_stray_anchor_bits_rejected() {
    for level in 0..MAX_LEVEL {
        let stray = 1u64 << (31 - level);
        assert!(
            Epoch::new(stray, level).is_err(),
            "bit {} accepted at level {}",
            31 - level,
            level
        );
        assert!(Epoch::new(stray, level + 1).is_ok());
    }
}

// ==================== Tree Shape Tests ====================

/// All epochs at `level`, reached from the root by child expansion.
fn expand(level: u8) -> Vec<Epoch> {
    let mut frontier = vec![Epoch::root()];
    for _ in 0..level {
        frontier = frontier
            .iter()
            .flat_map(|e| [e.left_child().unwrap(), e.right_child().unwrap()])
            .collect();
    }
    frontier
}

#[test]
fn test_levels_partition_time_domain() {
    for level in 0..=10u8 {
        let mut epochs = expand(level);
        assert_eq!(epochs.len(), 1 << level);
        epochs.sort_by_key(|e| e.start());
        assert_eq!(epochs[0].start(), 0);
        for pair in epochs.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start(), "gap or overlap at level {}", level);
        }
        assert_eq!(epochs.last().unwrap().end(), 1u64 << 32);
    }
}

#[test]
fn test_containing_epoch_is_reachable() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let t: u64 = rng.gen_range(0..(1u64 << 32));
        let level: u8 = rng.gen_range(0..=MAX_LEVEL);
        let epoch = Epoch::containing(t, level).unwrap();
        assert!(epoch.contains(t));
        // Walking the parents ends at the root, each containing t.
        let mut cursor = epoch;
        while let Some(parent) = cursor.parent() {
            assert!(parent.contains(t));
            cursor = parent;
        }
        assert_eq!(cursor, Epoch::root());
    }
}
