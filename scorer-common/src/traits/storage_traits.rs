// src/traits/storage_traits.rs
use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Error;

/// The persistent-store collaborator: a key/value store offering per-key
/// hash fields plus sorted sets keyed by score.
///
/// This is exactly the primitive the user record store and the global
/// index are built on. Field names and the index key form a fixed,
/// versionless schema; changes must be additive.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Set the given hash fields on `key`, creating the hash if absent.
    async fn hset(&self, key: &str, fields: &[(&str, String)]) -> Result<(), Error>;

    /// Read all hash fields of `key`. An absent key yields an empty map.
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, Error>;

    /// Delete `key` and all of its fields.
    async fn del(&self, key: &str) -> Result<(), Error>;

    /// Add `member` to the sorted set at `key`, or update its score.
    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), Error>;

    /// Remove `member` from the sorted set at `key`.
    async fn zrem(&self, key: &str, member: &str) -> Result<(), Error>;

    /// Cardinality of the sorted set at `key`.
    async fn zcard(&self, key: &str) -> Result<u64, Error>;

    /// Members of the sorted set at `key` with `min <= score <= max`,
    /// ordered by ascending score.
    async fn zrange_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<(String, f64)>, Error>;
}
