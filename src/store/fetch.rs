//! Fetch adapter: one storage read under the lookup's deadline.

use std::time::Duration;

use super::{Getter, StoreError};
use crate::engine::LookupContext;
use crate::types::{Address, LookupResult};

/// Outcome of a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Found(Vec<u8>),
    /// The store answered that no record exists.
    Absent,
    /// The store failed to answer; absence is unconfirmed.
    Transient(String),
}

/// Wraps a [`Getter`], folding its errors into [`Fetched`] and applying
/// the caller's deadline and cancellation.
pub struct Fetcher<'a, G: ?Sized> {
    getter: &'a G,
    fetch_timeout: Option<Duration>,
}

impl<'a, G: Getter + ?Sized> Fetcher<'a, G> {
    pub fn new(getter: &'a G, fetch_timeout: Option<Duration>) -> Self {
        Self {
            getter,
            fetch_timeout,
        }
    }

    /// Fetch `address`. Errors only when the whole lookup must stop
    /// (deadline or cancellation).
    pub async fn fetch(&self, ctx: &LookupContext, address: &Address) -> LookupResult<Fetched> {
        ctx.check()?;
        let get = async {
            match self.fetch_timeout {
                Some(limit) => match tokio::time::timeout(limit, self.getter.get(address)).await {
                    Ok(result) => result,
                    Err(_) => Err(StoreError::Unavailable(format!(
                        "fetch timed out after {}ms",
                        limit.as_millis()
                    ))),
                },
                None => self.getter.get(address).await,
            }
        };
        let fetched = match ctx.run(get).await? {
            Ok(record) => Fetched::Found(record),
            Err(StoreError::NotFound) => Fetched::Absent,
            Err(StoreError::Unavailable(reason)) => Fetched::Transient(reason),
        };
        Ok(fetched)
    }
}
