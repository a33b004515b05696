//! Artifact caching utilities for sharing loaded models across pipelines.
//!
//! Vectorizers and classifiers are loaded once and handed out as `Arc`s, so
//! every pipeline (one per session, say) built from the same artifacts reads
//! the same immutable instance.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Trait implemented by artifact option types to generate a stable cache key.
pub trait ModelOptions {
    fn cache_key(&self) -> String;
}

type CacheStorage = HashMap<(TypeId, String), Arc<dyn Any + Send + Sync>>;

/// A thread-safe cache of loaded artifacts.
///
/// Entries are keyed by the artifact type plus a string key (typically the
/// artifact source and device). Cached values are never mutated; callers get
/// a shared `Arc` to the same instance.
pub struct ModelCache {
    cache: Mutex<CacheStorage>,
}

impl ModelCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Get or load an artifact.
    ///
    /// If an artifact of type `M` with the given key is cached, the shared
    /// instance is returned. Otherwise `loader` runs and its result is stored.
    /// A failing loader leaves the cache untouched.
    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> anyhow::Result<Arc<M>>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> anyhow::Result<M>,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());

        if let Some(model) = self.lookup::<M>(&cache_key) {
            tracing::debug!(key, "artifact cache hit");
            return Ok(model);
        }

        // Loading happens outside the lock; a concurrent loader for the same
        // key may race, in which case the first stored instance wins.
        let model = Arc::new(loader()?);

        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("artifact cache lock poisoned"))?;
        let entry = cache
            .entry(cache_key)
            .or_insert_with(|| model.clone() as Arc<dyn Any + Send + Sync>)
            .clone();
        drop(cache);

        Ok(entry.downcast::<M>().unwrap_or(model))
    }

    fn lookup<M: Send + Sync + 'static>(&self, key: &(TypeId, String)) -> Option<Arc<M>> {
        let cache = self.cache.lock().ok()?;
        cache.get(key).cloned()?.downcast::<M>().ok()
    }

    /// Drop every cached artifact.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODEL_CACHE: once_cell::sync::Lazy<ModelCache> =
    once_cell::sync::Lazy::new(ModelCache::new);

/// Get a reference to the process-wide artifact cache.
pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}
