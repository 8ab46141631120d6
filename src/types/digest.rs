//! Fixed-width hash values: digests and storage addresses.

use serde::{Deserialize, Serialize};

use crate::types::error::{LookupError, LookupResult};

/// Width in bytes of every digest and address.
pub const HASH_SIZE: usize = 32;

macro_rules! hash_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub [u8; HASH_SIZE]);

        impl $name {
            pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse from hex, with or without a `0x` prefix.
            pub fn from_hex(s: &str) -> LookupResult<Self> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(s).map_err(|e| LookupError::InvalidHex(e.to_string()))?;
                let arr: [u8; HASH_SIZE] = bytes.as_slice().try_into().map_err(|_| {
                    LookupError::InvalidHex(format!(
                        "expected {} bytes, got {}",
                        HASH_SIZE,
                        bytes.len()
                    ))
                })?;
                Ok(Self(arr))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl std::str::FromStr for $name {
            type Err = LookupError;

            fn from_str(s: &str) -> LookupResult<Self> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; HASH_SIZE]> for $name {
            fn from(bytes: [u8; HASH_SIZE]) -> Self {
                Self(bytes)
            }
        }
    };
}

hash_newtype!(
    /// Output of the feed hash function (topic hashes, record identifiers).
    Digest
);

hash_newtype!(
    /// Content address fetched from storage.
    Address
);
