//! Seams to the signed-record layer: addressing and payload extraction.

pub mod address;

pub use address::{AddressScheme, SingleOwnerScheme};

use crate::types::{Address, LookupResult};

/// Turns a retrieved record into its payload.
///
/// Implementations verify the owner's signature; a record that fails
/// verification must come back as [`LookupError::Envelope`](crate::types::LookupError::Envelope).
pub trait Envelope: Send + Sync {
    fn extract(&self, address: &Address, record: Vec<u8>) -> LookupResult<Vec<u8>>;
}

/// Passes record bytes through unchanged, for stores that only hold verified payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawEnvelope;

impl Envelope for RawEnvelope {
    fn extract(&self, _address: &Address, record: Vec<u8>) -> LookupResult<Vec<u8>> {
        Ok(record)
    }
}
