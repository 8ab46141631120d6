//! Lookup engine — deadline handling and the interval search.

pub mod context;
pub mod search;

pub use context::{CancelHandle, LookupContext};
pub use search::{FeedLookup, FeedUpdate, SearchMode, SearchReport};
