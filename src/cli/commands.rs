//! CLI command implementations.

use std::path::Path;

use crate::engine::{FeedLookup, LookupContext};
use crate::envelope::{AddressScheme, SingleOwnerScheme};
use crate::index::{Epoch, FeedId, HasherPool};
use crate::store::DirStore;
use crate::types::{now_secs, LookupConfig, LookupResult, Owner};

/// Print the record identifier and storage address of one epoch of a feed.
pub fn cmd_address(
    config: &LookupConfig,
    owner: &Owner,
    topic: &str,
    anchor: u64,
    level: u8,
    json: bool,
) -> LookupResult<()> {
    let epoch = Epoch::new(anchor, level)?;
    let pool = HasherPool::new(config.hash, 1);
    let identifier = FeedId::new(&pool, topic.as_bytes(), epoch)?.identifier(&pool);
    let address = SingleOwnerScheme.derive(&pool, &identifier, owner)?;

    if json {
        let info = serde_json::json!({
            "owner": owner.to_string(),
            "topic": topic,
            "anchor": epoch.anchor(),
            "level": epoch.level(),
            "index": hex::encode(epoch.index()),
            "identifier": identifier.to_hex(),
            "address": address.to_hex(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_default()
        );
    } else {
        println!("Epoch: {}", epoch);
        println!("Interval: [{}, {})", epoch.start(), epoch.end());
        println!("Identifier: {}", identifier);
        println!("Address: {}", address);
    }
    Ok(())
}

/// Look up the latest update of a feed stored under a directory.
pub async fn cmd_lookup(
    config: &LookupConfig,
    store_dir: &Path,
    owner: &Owner,
    topic: &str,
    at: Option<u64>,
    as_hex: bool,
    json: bool,
) -> LookupResult<()> {
    let lookup = FeedLookup::with_config(DirStore::new(store_dir), config.clone());
    let at = at.unwrap_or_else(now_secs);
    let ctx = LookupContext::with_timeout(config.timeout());
    let update = lookup
        .lookup_update(owner, topic.as_bytes(), at, &ctx)
        .await?;

    if json {
        let info = serde_json::json!({
            "owner": owner.to_string(),
            "topic": topic,
            "at": at,
            "anchor": update.epoch.anchor(),
            "level": update.epoch.level(),
            "address": update.address.to_hex(),
            "payload": hex::encode(&update.payload),
            "report": update.report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_default()
        );
    } else if as_hex {
        println!("{}", hex::encode(&update.payload));
    } else {
        println!("{}", String::from_utf8_lossy(&update.payload));
    }
    Ok(())
}
