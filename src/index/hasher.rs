//! Hash contexts and the pool they are checked out from.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use crate::types::{Digest, HASH_SIZE};

/// Hash function behind topic hashes, identifiers and addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
    /// Legacy Keccak-256 (0x01 padding), as used by Ethereum-style networks.
    Keccak256,
}

/// A reusable, resettable hashing context.
#[derive(Clone)]
pub enum HashContext {
    Blake3(Box<blake3::Hasher>),
    Sha256(sha2::Sha256),
    Keccak256(sha3::Keccak256),
}

impl HashContext {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => HashContext::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => HashContext::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Keccak256 => HashContext::Keccak256(sha3::Keccak256::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            HashContext::Blake3(h) => {
                h.update(data);
            }
            HashContext::Sha256(h) => h.update(data),
            HashContext::Keccak256(h) => h.update(data),
        }
    }

    /// Produce the digest of everything written so far and clear the context.
    pub fn finalize_reset(&mut self) -> Digest {
        let mut out = [0u8; HASH_SIZE];
        match self {
            HashContext::Blake3(h) => {
                out.copy_from_slice(h.finalize().as_bytes());
                h.reset();
            }
            HashContext::Sha256(h) => out.copy_from_slice(&h.finalize_reset()),
            HashContext::Keccak256(h) => out.copy_from_slice(&h.finalize_reset()),
        }
        Digest(out)
    }

    pub fn reset(&mut self) {
        match self {
            HashContext::Blake3(h) => {
                h.reset();
            }
            HashContext::Sha256(h) => sha2::Digest::reset(h),
            HashContext::Keccak256(h) => sha3::Digest::reset(h),
        }
    }
}

/// Bounded pool of idle hash contexts.
///
/// Contexts are checked out with [`HasherPool::acquire`] and come back,
/// reset, when the guard drops. Demand beyond `capacity` allocates fresh
/// contexts that are discarded on release.
pub struct HasherPool {
    algorithm: HashAlgorithm,
    capacity: usize,
    idle: Mutex<Vec<HashContext>>,
}

impl HasherPool {
    pub fn new(algorithm: HashAlgorithm, capacity: usize) -> Self {
        Self {
            algorithm,
            capacity,
            idle: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Check out a context for the duration of one derivation.
    pub fn acquire(&self) -> PooledHasher<'_> {
        let ctx = self
            .idle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or_else(|| HashContext::new(self.algorithm));
        PooledHasher {
            pool: self,
            ctx: Some(ctx),
        }
    }

    /// Hash the concatenation of `parts` with a pooled context.
    pub fn digest(&self, parts: &[&[u8]]) -> Digest {
        let mut hasher = self.acquire();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize_reset()
    }

    /// Number of contexts currently waiting in the pool.
    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn release(&self, mut ctx: HashContext) {
        ctx.reset();
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        if idle.len() < self.capacity {
            idle.push(ctx);
        }
    }
}

/// A checked-out [`HashContext`]; returned to its pool on drop.
pub struct PooledHasher<'a> {
    pool: &'a HasherPool,
    ctx: Option<HashContext>,
}

impl Deref for PooledHasher<'_> {
    type Target = HashContext;

    fn deref(&self) -> &HashContext {
        // Only `drop` takes the context out.
        self.ctx.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for PooledHasher<'_> {
    fn deref_mut(&mut self) -> &mut HashContext {
        self.ctx.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledHasher<'_> {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            self.pool.release(ctx);
        }
    }
}
