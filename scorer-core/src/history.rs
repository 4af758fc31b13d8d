// scorer-core/src/history.rs
use tracing::debug;

use scorer_common::constants::MAX_ITEMS;

/// Enforce the item tracking limit on a history list.
///
/// Evicts from the front (oldest first) until at most `MAX_ITEMS` entries
/// remain, preserving the relative order of the remainder. Used for both
/// `tracked_ids` and `removed_ids`; eviction is purely positional.
pub fn trim_history(ids: &mut Vec<String>) {
    if ids.len() <= MAX_ITEMS {
        return;
    }
    let excess = ids.len() - MAX_ITEMS;
    for id in ids.drain(..excess) {
        debug!("Purged {} from tracking", id);
    }
}
