//! TTL and size bounded cache of built schema graphs.
//!
//! Readers load an immutable snapshot of the entry map and never wait on a
//! refresh. Refreshes are serialized behind one async mutex, so concurrent
//! callers that find the same entry stale trigger a single fetch and build;
//! the new graph is swapped in only once it is fully built.

use std::collections::BTreeMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::GuardConfig;
use crate::error::{BoxError, CacheError};
use crate::schema::{SchemaGraph, SchemaGraphBuilder};

/// Supplies raw schema documents, typically over HTTP.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Value, BoxError>;
}

#[async_trait]
impl<S: SchemaSource + ?Sized> SchemaSource for Arc<S> {
    async fn fetch(&self, key: &str) -> Result<Value, BoxError> {
        (**self).fetch(key).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry stays fresh after it was fetched.
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::from(&GuardConfig::default())
    }
}

impl From<&GuardConfig> for CacheConfig {
    fn from(config: &GuardConfig) -> Self {
        Self {
            ttl: config.schema_cache_ttl(),
            max_entries: config.max_cache_entries,
        }
    }
}

/// A built graph together with when and from what it was built.
#[derive(Debug)]
pub struct CachedSchema {
    pub graph: Arc<SchemaGraph>,
    pub fetched_at: Instant,
    /// Hash of the raw document the graph was built from.
    pub fingerprint: u64,
}

impl CachedSchema {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

type Entries = BTreeMap<String, Arc<CachedSchema>>;

pub struct SchemaCache<S> {
    source: S,
    builder: SchemaGraphBuilder,
    config: CacheConfig,
    entries: ArcSwap<Entries>,
    refresh: Mutex<()>,
}

impl<S: SchemaSource> SchemaCache<S> {
    pub fn new(source: S, builder: SchemaGraphBuilder, config: CacheConfig) -> Self {
        Self {
            source,
            builder,
            config,
            entries: ArcSwap::from_pointee(Entries::new()),
            refresh: Mutex::new(()),
        }
    }

    pub fn from_config(source: S, config: &GuardConfig) -> Self {
        Self::new(source, SchemaGraphBuilder::from_config(config), CacheConfig::from(config))
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// The fresh graph cached under `key`, without fetching.
    pub fn get(&self, key: &str) -> Option<Arc<SchemaGraph>> {
        self.entries
            .load()
            .get(key)
            .filter(|entry| entry.is_fresh(self.config.ttl))
            .map(|entry| Arc::clone(&entry.graph))
    }

    /// The graph cached under `key`, fetching and building it first when it
    /// is missing or stale.
    ///
    /// A failed refresh leaves any existing entry in place.
    pub async fn get_or_refresh(&self, key: &str) -> Result<Arc<SchemaGraph>, CacheError> {
        if let Some(graph) = self.get(key) {
            debug!(key, "schema cache hit");
            return Ok(graph);
        }

        let _guard = self.refresh.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(graph) = self.get(key) {
            debug!(key, "schema refreshed by a concurrent caller");
            return Ok(graph);
        }

        let document = self.source.fetch(key).await.map_err(|source| CacheError::Fetch {
            key: key.to_string(),
            source,
        })?;
        let fingerprint = fingerprint(&document);

        let previous = self.entries.load().get(key).cloned();
        let graph = match previous {
            Some(entry) if entry.fingerprint == fingerprint => {
                info!(key, "schema unchanged, extending cached graph");
                Arc::clone(&entry.graph)
            }
            _ => {
                let graph = self
                    .builder
                    .build_from_value(&document)
                    .map_err(|source| CacheError::Build {
                        key: key.to_string(),
                        source,
                    })?;
                info!(
                    key,
                    entities = graph.len(),
                    relationships = graph.relationship_count(),
                    "schema graph rebuilt"
                );
                Arc::new(graph)
            }
        };

        self.insert(key, Arc::clone(&graph), fingerprint);
        Ok(graph)
    }

    fn insert(&self, key: &str, graph: Arc<SchemaGraph>, fingerprint: u64) {
        let entry = Arc::new(CachedSchema {
            graph,
            fetched_at: Instant::now(),
            fingerprint,
        });

        // Writers hold the refresh lock, so a plain load-modify-store is safe.
        let mut entries = Entries::clone(&self.entries.load());
        entries.insert(key.to_string(), entry);
        while entries.len() > self.config.max_entries {
            let Some(oldest) = entries
                .iter()
                .filter(|(name, _)| name.as_str() != key)
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(name, _)| name.clone())
            else {
                break;
            };
            debug!(key = %oldest, "evicting oldest cached schema");
            entries.remove(&oldest);
        }
        self.entries.store(Arc::new(entries));
    }

    /// Drops the entry under `key`. Returns whether one existed.
    pub async fn invalidate(&self, key: &str) -> bool {
        let _guard = self.refresh.lock().await;
        let mut entries = Entries::clone(&self.entries.load());
        let removed = entries.remove(key).is_some();
        if removed {
            self.entries.store(Arc::new(entries));
            info!(key, "schema cache entry invalidated");
        }
        removed
    }

    pub async fn clear(&self) {
        let _guard = self.refresh.lock().await;
        let count = self.entries.load().len();
        self.entries.store(Arc::new(Entries::new()));
        info!(count, "schema cache cleared");
    }

    /// Number of entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Snapshot of an entry including its timestamps, fresh or stale.
    pub fn entry(&self, key: &str) -> Option<Arc<CachedSchema>> {
        self.entries.load().get(key).cloned()
    }
}

/// Hash of the canonical JSON text of a document. Object keys are sorted,
/// so equal documents hash equally regardless of key order.
fn fingerprint(document: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    document.to_string().hash(&mut hasher);
    hasher.finish()
}
