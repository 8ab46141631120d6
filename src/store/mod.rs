//! Content-addressed retrieval — the storage seam and the fetch adapter.

pub mod dir;
pub mod fetch;
pub mod memory;

pub use dir::DirStore;
pub use fetch::{Fetched, Fetcher};
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Address;

/// Why a record could not be retrieved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Nothing was ever stored at the address (or it has been collected).
    #[error("Record not found")]
    NotFound,

    /// The store could not answer: network, timeout or storage fault.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Retrieval by content address.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, address: &Address) -> Result<Vec<u8>, StoreError>;
}

#[async_trait]
impl<G: Getter + ?Sized> Getter for Arc<G> {
    async fn get(&self, address: &Address) -> Result<Vec<u8>, StoreError> {
        (**self).get(address).await
    }
}
