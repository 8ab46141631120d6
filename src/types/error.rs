//! Error types for feed lookup.

use thiserror::Error;

/// All errors that can surface from a feed lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Owner identity is not a 20-byte value.
    #[error("Invalid owner identity: {0}")]
    InvalidIdentity(String),

    /// Topic cannot be used to name a feed.
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    /// Level lies outside the interval tree.
    #[error("Level {level} exceeds maximum level {max}")]
    InvalidLevel { level: u8, max: u8 },

    /// Anchor has bits set that its level cannot represent.
    #[error("Anchor {anchor:#x} is not aligned to level {level}")]
    InvalidAnchor { anchor: u64, level: u8 },

    /// No update exists for this feed at or before the requested time.
    #[error("No feed update found at or before {0}")]
    NotFound(u64),

    /// Nothing was found, but at least one fetch failed for reasons other than absence.
    #[error("Feed update unavailable: {0}")]
    Unavailable(String),

    /// The lookup deadline passed, or the caller cancelled it, while a fetch was in flight.
    #[error("Lookup deadline exceeded")]
    DeadlineExceeded,

    /// A record was present but its payload could not be extracted.
    #[error("Envelope error: {0}")]
    Envelope(String),

    /// Malformed hex digest or address.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Configuration could not be parsed or serialized.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for feed lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;
