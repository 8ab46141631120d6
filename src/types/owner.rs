//! Owner identity of a feed.

use serde::{Deserialize, Serialize};

use crate::types::error::{LookupError, LookupResult};

/// Length in bytes of an owner identity.
pub const OWNER_SIZE: usize = 20;

/// The public identity that signs every update of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner([u8; OWNER_SIZE]);

impl Owner {
    pub fn new(bytes: [u8; OWNER_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build from a slice; anything but exactly 20 bytes is rejected.
    pub fn from_slice(bytes: &[u8]) -> LookupResult<Self> {
        let arr: [u8; OWNER_SIZE] = bytes.try_into().map_err(|_| {
            LookupError::InvalidIdentity(format!(
                "expected {} bytes, got {}",
                OWNER_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> LookupResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| LookupError::InvalidIdentity(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; OWNER_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl std::str::FromStr for Owner {
    type Err = LookupError;

    fn from_str(s: &str) -> LookupResult<Self> {
        Self::from_hex(s)
    }
}
