// scorer-core/src/storage/memory.rs
use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use scorer_common::traits::KvStore;

use crate::Error;

/// In-memory [`KvStore`] used by tests and local runs. Hashes and sorted
/// sets live in `DashMap`s; sorted-set ordering is materialized on read.
#[derive(Default)]
pub struct InMemoryKv {
    hashes: DashMap<String, HashMap<String, String>>,
    zsets: DashMap<String, HashMap<String, f64>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for InMemoryKv {
    async fn hset(&self, key: &str, fields: &[(&str, String)]) -> Result<(), Error> {
        let mut hash = self.hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            hash.insert(field.to_string(), value.clone());
        }
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, Error> {
        Ok(self.hashes.get(key).map(|hash| hash.value().clone()).unwrap_or_default())
    }

    async fn del(&self, key: &str) -> Result<(), Error> {
        self.hashes.remove(key);
        Ok(())
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), Error> {
        self.zsets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<(), Error> {
        if let Some(mut zset) = self.zsets.get_mut(key) {
            zset.remove(member);
        }
        Ok(())
    }

    async fn zcard(&self, key: &str) -> Result<u64, Error> {
        Ok(self.zsets.get(key).map(|zset| zset.len() as u64).unwrap_or(0))
    }

    async fn zrange_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<(String, f64)>, Error> {
        let mut members: Vec<(String, f64)> = match self.zsets.get(key) {
            Some(zset) => zset
                .iter()
                .filter(|(_, score)| **score >= min && **score <= max)
                .map(|(member, score)| (member.clone(), *score))
                .collect(),
            None => Vec::new(),
        };
        // Ascending by score, ties broken by member name for determinism
        members.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        Ok(members)
    }
}
