//! Deduplicating texture cache
//!
//! Every key maps to either a completed texture or an in-flight shared load,
//! so concurrent requests for the same asset share one fetch and one decode.
//! Views hold `Arc` clones of what they display; an entry's strong count is its
//! reference count. Entries nobody holds any more move to an LRU of retired
//! textures instead of being dropped outright.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;

use super::loader::{AssetFetcher, HttpFetcher, Texture};
use super::source::{AssetOrigin, HostSource, TextureSource};
use crate::core::config::{EngineConfig, TextureLoadingConfig};
use crate::prelude::{HashMap, HashSet};

pub type TextureHandle = Arc<Texture>;

type PendingLoad = Shared<BoxFuture<'static, Option<TextureHandle>>>;

struct CacheState {
    live: HashMap<String, TextureHandle>,
    pending: HashMap<String, PendingLoad>,
    retired: LruCache<String, TextureHandle>,
    failed: HashSet<String>,
    fetches: usize,
}

#[derive(Clone)]
pub struct TextureCache {
    state: Arc<Mutex<CacheState>>,
    source: Arc<dyn TextureSource>,
    fetcher: Arc<dyn AssetFetcher>,
    config: TextureLoadingConfig,
}

impl TextureCache {
    pub fn new(
        source: Arc<dyn TextureSource>,
        fetcher: Arc<dyn AssetFetcher>,
        config: TextureLoadingConfig,
    ) -> Self {
        let capacity = NonZeroUsize::new(config.retired_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Arc::new(Mutex::new(CacheState {
                live: HashMap::default(),
                pending: HashMap::default(),
                retired: LruCache::new(capacity),
                failed: HashSet::default(),
                fetches: 0,
            })),
            source,
            fetcher,
            config,
        }
    }

    /// Cache resolving against the configured hosts over HTTP
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Arc::new(HostSource::from_config(&config.assets)),
            Arc::new(HttpFetcher::new(config.textures.max_retries)),
            config.textures.clone(),
        )
    }

    pub fn with_fetcher(config: &EngineConfig, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self::new(
            Arc::new(HostSource::from_config(&config.assets)),
            fetcher,
            config.textures.clone(),
        )
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cache key for an asset path
    pub fn key_for(&self, resource: &str, origin: AssetOrigin) -> String {
        self.source.url(resource, origin)
    }

    /// Loads an asset referenced by snapshot data. `None` means missing.
    pub async fn load(&self, resource: &str) -> Option<TextureHandle> {
        self.load_key(self.key_for(resource, AssetOrigin::Remote)).await
    }

    /// Loads art shipped with the engine.
    pub async fn load_bundled(&self, path: &str) -> Option<TextureHandle> {
        self.load_key(self.key_for(path, AssetOrigin::Bundled)).await
    }

    async fn load_key(&self, key: String) -> Option<TextureHandle> {
        let pending = {
            let mut state = self.lock();

            if let Some(texture) = state.live.get(&key) {
                return Some(Arc::clone(texture));
            }
            if self.config.remember_failures && state.failed.contains(&key) {
                return None;
            }
            if let Some(texture) = state.retired.pop(&key) {
                state.live.insert(key, Arc::clone(&texture));
                return Some(texture);
            }

            let in_flight = state.pending.get(&key).cloned();
            match in_flight {
                Some(pending) => pending,
                None => {
                    let pending = self.start_load(key.clone());
                    state.pending.insert(key.clone(), pending.clone());
                    state.fetches += 1;
                    pending
                }
            }
        };

        pending.await
    }

    fn start_load(&self, key: String) -> PendingLoad {
        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::clone(&self.state);

        async move {
            let outcome = match fetcher.fetch(&key).await {
                Ok(bytes) => match Texture::decode(key.clone(), &bytes) {
                    Ok(texture) => Some(Arc::new(texture)),
                    Err(e) => {
                        log::warn!("could not decode texture {}: {}", key, e);
                        None
                    }
                },
                Err(e) => {
                    log::warn!("could not load texture {}: {}", key, e);
                    None
                }
            };
            settle(&state, &key, &outcome);
            outcome
        }
        .boxed()
        .shared()
    }

    /// Completed texture for a key, without loading
    pub fn get(&self, key: &str) -> Option<TextureHandle> {
        self.lock().live.get(key).cloned()
    }

    /// Retires a texture once no view holds it. Returns true if it was retired.
    pub fn release(&self, key: &str) -> bool {
        let mut state = self.lock();
        let unused = state
            .live
            .get(key)
            .map(|texture| Arc::strong_count(texture) == 1)
            .unwrap_or(false);
        if !unused {
            return false;
        }
        if let Some(texture) = state.live.remove(key) {
            state.retired.put(key.to_string(), texture);
        }
        true
    }

    /// Forgets a remembered failure so the next load fetches again.
    pub fn forget(&self, key: &str) {
        self.lock().failed.remove(key);
    }

    /// Number of underlying fetches started so far
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }

    pub fn live_len(&self) -> usize {
        self.lock().live.len()
    }

    pub fn retired_len(&self) -> usize {
        self.lock().retired.len()
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.live.clear();
        state.retired.clear();
        state.failed.clear();
    }
}

/// Records the outcome of a finished load exactly once.
fn settle(state: &Mutex<CacheState>, key: &str, outcome: &Option<TextureHandle>) {
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    state.pending.remove(key);
    match outcome {
        Some(texture) => {
            state.live.insert(key.to_string(), Arc::clone(texture));
        }
        None => {
            state.failed.insert(key.to_string());
        }
    }
}

impl std::fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("TextureCache")
            .field("live", &state.live.len())
            .field("pending", &state.pending.len())
            .field("retired", &state.retired.len())
            .field("fetches", &state.fetches)
            .finish()
    }
}
