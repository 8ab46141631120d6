//! Directory-backed record store: one file per record, named by hex address.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{Getter, StoreError};
use crate::types::{Address, LookupResult};

pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, address: &Address) -> PathBuf {
        self.root.join(address.to_hex())
    }

    /// Write a record, creating the root directory if needed.
    pub async fn put(&self, address: &Address, record: &[u8]) -> LookupResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.path_for(address), record).await?;
        Ok(())
    }
}

#[async_trait]
impl Getter for DirStore {
    async fn get(&self, address: &Address) -> Result<Vec<u8>, StoreError> {
        match tokio::fs::read(self.path_for(address)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }
}
