//! Named cache generations holding request/response snapshots.

use super::request::{FetchResponse, RequestKey};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;

/// A stored response plus the generation it lives in.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub response: FetchResponse,
    pub generation: String,
    pub stored_at: Instant,
}

/// Name and origin of a generation present in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInfo {
    pub name: String,
    /// Opened by an install step rather than lazily at runtime.
    pub created_at_install: bool,
}

/// Storage of cache generations, in the shape of the browser's `CacheStorage`.
///
/// `put` overwrites: there is at most one entry per key per generation and
/// the last writer wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Create the generation if it does not exist yet.
    async fn open(&self, generation: &str, at_install: bool) -> Result<()>;
    async fn put(&self, generation: &str, key: &RequestKey, response: FetchResponse) -> Result<()>;
    async fn get(&self, generation: &str, key: &RequestKey) -> Result<Option<CacheEntry>>;
    /// First match across generations, in creation order.
    async fn match_any(&self, key: &RequestKey) -> Result<Option<CacheEntry>>;
    async fn delete_generation(&self, generation: &str) -> Result<bool>;
    async fn generations(&self) -> Result<Vec<GenerationInfo>>;
    async fn len(&self, generation: &str) -> Result<usize>;
    fn name(&self) -> &'static str;

    async fn generation_names(&self) -> Result<Vec<String>> {
        Ok(self.generations().await?.into_iter().map(|g| g.name).collect())
    }
}

struct Bucket {
    info: GenerationInfo,
    entries: HashMap<RequestKey, CacheEntry>,
}

/// In-process store; generations kept in creation order.
#[derive(Default)]
pub struct MemoryCacheStore {
    buckets: RwLock<Vec<Bucket>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn open(&self, generation: &str, at_install: bool) -> Result<()> {
        let mut buckets = self.buckets.write().await;
        if !buckets.iter().any(|b| b.info.name == generation) {
            buckets.push(Bucket {
                info: GenerationInfo {
                    name: generation.to_string(),
                    created_at_install: at_install,
                },
                entries: HashMap::new(),
            });
        }
        Ok(())
    }

    async fn put(&self, generation: &str, key: &RequestKey, response: FetchResponse) -> Result<()> {
        let mut buckets = self.buckets.write().await;
        let idx = match buckets.iter().position(|b| b.info.name == generation) {
            Some(i) => i,
            None => {
                buckets.push(Bucket {
                    info: GenerationInfo {
                        name: generation.to_string(),
                        created_at_install: false,
                    },
                    entries: HashMap::new(),
                });
                buckets.len() - 1
            }
        };
        buckets[idx].entries.insert(
            key.clone(),
            CacheEntry {
                response,
                generation: generation.to_string(),
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, generation: &str, key: &RequestKey) -> Result<Option<CacheEntry>> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .iter()
            .find(|b| b.info.name == generation)
            .and_then(|b| b.entries.get(key).cloned()))
    }

    async fn match_any(&self, key: &RequestKey) -> Result<Option<CacheEntry>> {
        let buckets = self.buckets.read().await;
        Ok(buckets.iter().find_map(|b| b.entries.get(key).cloned()))
    }

    async fn delete_generation(&self, generation: &str) -> Result<bool> {
        let mut buckets = self.buckets.write().await;
        let before = buckets.len();
        buckets.retain(|b| b.info.name != generation);
        Ok(buckets.len() != before)
    }

    async fn generations(&self) -> Result<Vec<GenerationInfo>> {
        Ok(self
            .buckets
            .read()
            .await
            .iter()
            .map(|b| b.info.clone())
            .collect())
    }

    async fn len(&self, generation: &str) -> Result<usize> {
        Ok(self
            .buckets
            .read()
            .await
            .iter()
            .find(|b| b.info.name == generation)
            .map(|b| b.entries.len())
            .unwrap_or(0))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
