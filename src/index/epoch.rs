//! Interval codec — epochs of the binary time tree and their 9-byte index encoding.
//!
//! The tree spans a 32-bit time domain carried in u64 anchors. An epoch at
//! level `l` covers `2^(32 - l)` consecutive seconds starting at its anchor;
//! only the top `l` bits of the 32-bit domain may be set in the anchor.

use crate::types::error::{LookupError, LookupResult};

/// Deepest level of the tree. Leaf epochs cover a single second.
pub const MAX_LEVEL: u8 = 32;

/// Width of the time domain spanned by the root epoch.
pub const TIME_BITS: u32 = 32;

/// Encoded size of an epoch: 8-byte little-endian anchor followed by the level byte.
pub const INDEX_SIZE: usize = 9;

/// One node of the interval tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch {
    anchor: u64,
    level: u8,
}

/// Bits of an anchor that a level is allowed to set.
fn level_mask(level: u8) -> u64 {
    let level = u32::from(level);
    ((1u64 << level) - 1) << (TIME_BITS - level)
}

impl Epoch {
    /// Build an epoch, rejecting levels past [`MAX_LEVEL`] and anchors with stray low bits.
    pub fn new(anchor: u64, level: u8) -> LookupResult<Self> {
        if level > MAX_LEVEL {
            return Err(LookupError::InvalidLevel {
                level,
                max: MAX_LEVEL,
            });
        }
        if anchor & !level_mask(level) != 0 {
            return Err(LookupError::InvalidAnchor { anchor, level });
        }
        Ok(Self { anchor, level })
    }

    /// The epoch covering the whole time domain.
    pub fn root() -> Self {
        Self {
            anchor: 0,
            level: 0,
        }
    }

    /// The epoch at `level` whose interval contains `time`.
    /// Times past the domain are clamped into the last epoch.
    pub fn containing(time: u64, level: u8) -> LookupResult<Self> {
        let time = time.min(u64::from(u32::MAX));
        if level > MAX_LEVEL {
            return Err(LookupError::InvalidLevel {
                level,
                max: MAX_LEVEL,
            });
        }
        Ok(Self {
            anchor: time & level_mask(level),
            level,
        })
    }

    pub fn anchor(&self) -> u64 {
        self.anchor
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Start of the half-open interval (same as the anchor).
    pub fn start(&self) -> u64 {
        self.anchor
    }

    /// Number of seconds covered.
    pub fn length(&self) -> u64 {
        1u64 << (TIME_BITS - u32::from(self.level))
    }

    /// Exclusive end of the interval.
    pub fn end(&self) -> u64 {
        self.anchor + self.length()
    }

    pub fn contains(&self, time: u64) -> bool {
        time >= self.start() && time < self.end()
    }

    pub fn is_leaf(&self) -> bool {
        self.level == MAX_LEVEL
    }

    /// Later half of this interval, or `None` at the leaf level.
    pub fn right_child(&self) -> Option<Self> {
        if self.is_leaf() {
            return None;
        }
        let level = self.level + 1;
        Some(Self {
            anchor: self.anchor | (1u64 << (TIME_BITS - u32::from(level))),
            level,
        })
    }

    /// Earlier half of this interval: same anchor, one level deeper.
    pub fn left_child(&self) -> Option<Self> {
        if self.is_leaf() {
            return None;
        }
        Some(Self {
            anchor: self.anchor,
            level: self.level + 1,
        })
    }

    pub fn parent(&self) -> Option<Self> {
        let level = self.level.checked_sub(1)?;
        Some(Self {
            anchor: self.anchor & level_mask(level),
            level,
        })
    }

    /// Fixed 9-byte index: anchor little-endian, then level.
    pub fn index(&self) -> [u8; INDEX_SIZE] {
        let mut b = [0u8; INDEX_SIZE];
        b[..8].copy_from_slice(&self.anchor.to_le_bytes());
        b[8] = self.level;
        b
    }

    /// Decode a 9-byte index, applying the same validation as [`Epoch::new`].
    pub fn from_index(index: &[u8; INDEX_SIZE]) -> LookupResult<Self> {
        let mut anchor = [0u8; 8];
        anchor.copy_from_slice(&index[..8]);
        Self::new(u64::from_le_bytes(anchor), index[8])
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.anchor, self.level)
    }
}
