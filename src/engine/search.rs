//! Interval search — finding the latest feed update at or before a point in time.
//!
//! Updates live at addresses derived from (topic, epoch, owner); nothing
//! links them together. Starting at the root epoch, each present epoch is
//! refined by probing its later half first and its earlier half second.
//! The deepest present epoch along that walk whose anchor does not exceed
//! the requested time wins. A missing (or unreachable) epoch prunes its
//! subtree, and its parent answers instead.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::engine::context::LookupContext;
use crate::envelope::{AddressScheme, Envelope, RawEnvelope, SingleOwnerScheme};
use crate::index::{topic_hash, Epoch, FeedId, HasherPool};
use crate::store::{Fetched, Fetcher, Getter};
use crate::types::{now_secs, Address, Digest, LookupConfig, LookupError, LookupResult, Owner};

/// How the two halves of a present epoch are explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Later half, then earlier half only if the later one yields nothing.
    #[default]
    Sequential,
    /// Both halves at once; the earlier half is dropped as soon as the later one succeeds.
    /// Same answers as `Sequential`, more fetches, lower latency.
    Speculative,
}

/// Fetch counters for one lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Fetches issued.
    pub fetches: u32,
    pub found: u32,
    pub absent: u32,
    pub transient: u32,
    /// Epochs skipped because they start after the requested time.
    pub too_late: u32,
}

/// A feed update located by a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUpdate {
    /// Epoch whose record carried the payload.
    pub epoch: Epoch,
    pub address: Address,
    pub payload: Vec<u8>,
    pub report: SearchReport,
}

/// Locates feed updates in a content-addressed store.
pub struct FeedLookup<G> {
    store: G,
    scheme: Arc<dyn AddressScheme>,
    envelope: Arc<dyn Envelope>,
    pool: HasherPool,
    config: LookupConfig,
}

impl<G: Getter> FeedLookup<G> {
    pub fn new(store: G) -> Self {
        Self::with_config(store, LookupConfig::default())
    }

    pub fn with_config(store: G, config: LookupConfig) -> Self {
        Self {
            store,
            scheme: Arc::new(SingleOwnerScheme),
            envelope: Arc::new(RawEnvelope),
            pool: HasherPool::new(config.hash, config.hasher_pool_size),
            config,
        }
    }

    pub fn with_scheme(mut self, scheme: impl AddressScheme + 'static) -> Self {
        self.scheme = Arc::new(scheme);
        self
    }

    pub fn with_envelope(mut self, envelope: impl Envelope + 'static) -> Self {
        self.envelope = Arc::new(envelope);
        self
    }

    pub fn store(&self) -> &G {
        &self.store
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn hasher_pool(&self) -> &HasherPool {
        &self.pool
    }

    /// Record identifier of `epoch` in the feed named by `topic`.
    pub fn identifier(&self, topic: &[u8], epoch: Epoch) -> LookupResult<Digest> {
        Ok(FeedId::new(&self.pool, topic, epoch)?.identifier(&self.pool))
    }

    /// Storage address of `epoch` in the feed (`owner`, `topic`).
    pub fn address(&self, owner: &Owner, topic: &[u8], epoch: Epoch) -> LookupResult<Address> {
        let identifier = self.identifier(topic, epoch)?;
        self.scheme.derive(&self.pool, &identifier, owner)
    }

    /// Payload of the latest update at or before `at`.
    pub async fn lookup(
        &self,
        owner: &Owner,
        topic: &[u8],
        at: u64,
        ctx: &LookupContext,
    ) -> LookupResult<Vec<u8>> {
        Ok(self.lookup_update(owner, topic, at, ctx).await?.payload)
    }

    /// Latest update as of now, bounded by the configured timeout.
    pub async fn lookup_latest(&self, owner: &Owner, topic: &[u8]) -> LookupResult<Vec<u8>> {
        let ctx = LookupContext::with_timeout(self.config.timeout());
        self.lookup(owner, topic, now_secs(), &ctx).await
    }

    /// Like [`lookup`](Self::lookup), also reporting where the payload came from.
    pub async fn lookup_update(
        &self,
        owner: &Owner,
        topic: &[u8],
        at: u64,
        ctx: &LookupContext,
    ) -> LookupResult<FeedUpdate> {
        let search = Search {
            lookup: self,
            owner,
            topic: topic_hash(&self.pool, topic)?,
            at,
            ctx,
            fetcher: Fetcher::new(&self.store, self.config.fetch_timeout()),
            stats: Stats::default(),
        };
        debug!(
            "feed lookup owner={} at={} mode={:?}",
            owner, at, self.config.mode
        );

        let hit = search.visit(Epoch::root()).await?;
        let report = search.stats.report();
        match hit {
            Some(hit) => {
                debug!("feed lookup resolved to epoch {} ({:?})", hit.epoch, report);
                Ok(FeedUpdate {
                    epoch: hit.epoch,
                    address: hit.address,
                    payload: hit.payload,
                    report,
                })
            }
            None if report.transient > 0 => {
                let reason = search.stats.last_transient().unwrap_or_default();
                Err(LookupError::Unavailable(format!(
                    "{} of {} fetches failed: {}",
                    report.transient, report.fetches, reason
                )))
            }
            None => Err(LookupError::NotFound(at)),
        }
    }
}

struct Hit {
    epoch: Epoch,
    address: Address,
    payload: Vec<u8>,
}

#[derive(Default)]
struct Stats {
    fetches: AtomicU32,
    found: AtomicU32,
    absent: AtomicU32,
    transient: AtomicU32,
    too_late: AtomicU32,
    last_transient: Mutex<Option<String>>,
}

impl Stats {
    fn bump(counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_transient(&self, reason: String) {
        Self::bump(&self.transient);
        *self.last_transient.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason);
    }

    fn last_transient(&self) -> Option<String> {
        self.last_transient
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn report(&self) -> SearchReport {
        SearchReport {
            fetches: self.fetches.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            absent: self.absent.load(Ordering::Relaxed),
            transient: self.transient.load(Ordering::Relaxed),
            too_late: self.too_late.load(Ordering::Relaxed),
        }
    }
}

/// State of one lookup call.
struct Search<'a, G> {
    lookup: &'a FeedLookup<G>,
    owner: &'a Owner,
    topic: Digest,
    at: u64,
    ctx: &'a LookupContext,
    fetcher: Fetcher<'a, G>,
    stats: Stats,
}

impl<G: Getter> Search<'_, G> {
    fn address_of(&self, epoch: Epoch) -> LookupResult<Address> {
        let pool = &self.lookup.pool;
        let identifier = FeedId::from_topic_hash(self.topic, epoch).identifier(pool);
        self.lookup.scheme.derive(pool, &identifier, self.owner)
    }

    /// Best update in the subtree rooted at `epoch`; `None` when the subtree
    /// holds nothing admissible. Errors abort the whole lookup.
    fn visit(&self, epoch: Epoch) -> BoxFuture<'_, LookupResult<Option<Hit>>> {
        async move {
            if epoch.anchor() > self.at {
                Stats::bump(&self.stats.too_late);
                trace!("epoch {} starts after {}", epoch, self.at);
                return Ok(None);
            }

            let address = self.address_of(epoch)?;
            Stats::bump(&self.stats.fetches);
            let record = match self.fetcher.fetch(self.ctx, &address).await? {
                Fetched::Found(record) => record,
                Fetched::Absent => {
                    Stats::bump(&self.stats.absent);
                    debug!("epoch {} absent at {}", epoch, address);
                    return Ok(None);
                }
                Fetched::Transient(reason) => {
                    warn!(
                        "backtracking past epoch {} at {} after fetch failure: {}",
                        epoch, address, reason
                    );
                    self.stats.record_transient(reason);
                    return Ok(None);
                }
            };
            Stats::bump(&self.stats.found);
            debug!("epoch {} present at {}", epoch, address);

            let best = Hit {
                epoch,
                address,
                payload: self.lookup.envelope.extract(&address, record)?,
            };
            let (Some(right), Some(left)) = (epoch.right_child(), epoch.left_child()) else {
                return Ok(Some(best));
            };
            let deeper = match self.lookup.config.mode {
                SearchMode::Sequential => self.descend(right, left).await?,
                SearchMode::Speculative => self.descend_speculative(right, left).await?,
            };
            Ok(Some(deeper.unwrap_or(best)))
        }
        .boxed()
    }

    async fn descend(&self, right: Epoch, left: Epoch) -> LookupResult<Option<Hit>> {
        if let Some(hit) = self.visit(right).await? {
            return Ok(Some(hit));
        }
        self.visit(left).await
    }

    async fn descend_speculative(&self, right: Epoch, left: Epoch) -> LookupResult<Option<Hit>> {
        let mut right_search = self.visit(right);
        let mut left_search = self.visit(left);
        // Held back until the right half has failed, so errors surface as in sequential order.
        let mut left_result = None;

        loop {
            tokio::select! {
                biased;
                result = &mut right_search => match result? {
                    Some(hit) => return Ok(Some(hit)),
                    None => break,
                },
                result = &mut left_search, if left_result.is_none() => {
                    left_result = Some(result);
                }
            }
        }

        match left_result {
            Some(result) => result,
            None => left_search.await,
        }
    }
}
