//! Address derivation — binding a record identifier to its owner.

use crate::index::HasherPool;
use crate::types::{Address, Digest, LookupResult, Owner};

/// Combines a record identifier and an owner identity into the storage address.
pub trait AddressScheme: Send + Sync {
    fn derive(&self, pool: &HasherPool, identifier: &Digest, owner: &Owner)
        -> LookupResult<Address>;
}

/// Single-owner addressing: `H(identifier || owner)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleOwnerScheme;

impl AddressScheme for SingleOwnerScheme {
    fn derive(
        &self,
        pool: &HasherPool,
        identifier: &Digest,
        owner: &Owner,
    ) -> LookupResult<Address> {
        Ok(Address(pool.digest(&[&identifier.0, owner.as_bytes()]).0))
    }
}
