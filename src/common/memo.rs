// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::lru::Lru;
use crate::common::promise::take_first_fulfilled;
use crate::domain::error::RouterError;
use crate::infrastructure::network::remote_cache::RemoteCacheStore;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A freshly started attempt younger than this is piled onto instead of
/// spawning another once the parallelism cap is filled.
const REUSE_WINDOW: Duration = Duration::from_secs(1);

const MS_PER_DAY: u64 = 86_400_000;

pub type ValidityCheck<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

/// Optional write-through to a remote object cache. Uploads are
/// fire-and-forget on resolution; lookups race the remote fetch against the
/// live call and take whichever fulfills first.
#[derive(Clone)]
pub struct PersistLayer<V> {
    pub name: String,
    pub version: String,
    pub store: Arc<dyn RemoteCacheStore>,
    pub encode: Arc<dyn Fn(&V) -> Option<Vec<u8>> + Send + Sync>,
    pub decode: Arc<dyn Fn(&[u8]) -> Option<V> + Send + Sync>,
}

impl<V> PersistLayer<V> {
    /// Object keys bucket by day so the remote cache rotates naturally.
    fn object_key(&self, content_hash: u64, now_ms: u64) -> String {
        format!(
            "{}/{}/{}/{:016x}",
            now_ms / MS_PER_DAY,
            self.name,
            self.version,
            content_hash
        )
    }
}

pub struct MemoOptions<V> {
    /// Epoch length; the cache bucket rotates every `ttl`.
    pub ttl: Duration,
    /// Upper bound on how old a stale fallback value may be.
    pub max_age: Option<Duration>,
    /// Concurrent in-flight attempts allowed per (args, epoch) key.
    pub parallelism: usize,
    /// Serve the newest resolved value from an earlier epoch while the
    /// current epoch's attempt is still pending.
    pub using_stale_value: bool,
    /// Per-attempt timeout; a timed-out attempt is purged so the next call
    /// retries fresh.
    pub request_timeout: Option<Duration>,
    /// LRU capacity of the backing store.
    pub max_entries: usize,
    /// Resolved values failing this check are returned but never cached.
    pub is_valid: Option<ValidityCheck<V>>,
    pub persist: Option<PersistLayer<V>>,
}

impl<V> MemoOptions<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            max_age: None,
            parallelism: 1,
            using_stale_value: false,
            request_timeout: None,
            max_entries: 256,
            is_valid: None,
            persist: None,
        }
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn using_stale_value(mut self) -> Self {
        self.using_stale_value = true;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn is_valid(mut self, check: ValidityCheck<V>) -> Self {
        self.is_valid = Some(check);
        self
    }

    pub fn persist(mut self, layer: PersistLayer<V>) -> Self {
        self.persist = Some(layer);
        self
    }
}

type AttemptFuture<V> = Shared<BoxFuture<'static, Result<V, Arc<RouterError>>>>;

struct Attempt<V> {
    id: u64,
    started: Instant,
    fut: AttemptFuture<V>,
}

type CacheKey = (u64, u64); // (content hash, epoch)
type Slot<V> = Vec<Attempt<V>>;
type Store<V> = Arc<Mutex<Lru<CacheKey, Slot<V>>>>;

/// TTL/epoch-based async memoization over an LRU store.
///
/// A logical key is the caller-supplied argument hash; the cache bucket is
/// `(hash, floor(now / ttl))`, so all buckets roll over together at epoch
/// boundaries. Rejections are never cached: a failed attempt deletes its
/// own entry before surfacing the error, and every waiter sharing that
/// attempt observes the same failure.
///
/// Instances are constructor-injected where they are needed; there are no
/// module-level singletons.
pub struct TtlMemo<V: Clone + Send + Sync + 'static> {
    opts: MemoOptions<V>,
    store: Store<V>,
    next_attempt: AtomicU64,
}

impl<V: Clone + Send + Sync + 'static> TtlMemo<V> {
    pub fn new(opts: MemoOptions<V>) -> Self {
        let store = Arc::new(Mutex::new(Lru::with_max_age(
            opts.max_entries,
            opts.max_age,
        )));
        Self {
            opts,
            store,
            next_attempt: AtomicU64::new(0),
        }
    }

    /// Resolve `key` through the cache, invoking `load` only when the
    /// current epoch holds no usable attempt.
    pub async fn get_or_fetch<K, F, Fut>(&self, key: &K, load: F) -> Result<V, RouterError>
    where
        K: Hash,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, RouterError>> + Send + 'static,
    {
        let content_hash = hash_of(key);
        let now_ms = unix_ms();
        let ttl_ms = (self.opts.ttl.as_millis() as u64).max(1);
        let epoch = now_ms / ttl_ms;
        let cache_key = (content_hash, epoch);

        let mut spawned: Option<AttemptFuture<V>> = None;
        let fut = {
            let mut guard = self.store.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.get_mut(&cache_key).is_none() {
                guard.set(cache_key, Vec::new());
            }
            let slot = guard.get_mut(&cache_key).ok_or_else(|| {
                RouterError::Config("memo slot vanished during insert".into())
            })?;

            if let Some(value) = newest_resolved(slot) {
                return Ok(value);
            }
            let reusable = if slot.len() >= self.opts.parallelism {
                slot.last()
                    .filter(|a| a.started.elapsed() < REUSE_WINDOW)
                    .map(|a| a.fut.clone())
            } else {
                None
            };
            match reusable {
                Some(fut) => fut,
                None => {
                    let attempt = self.build_attempt(cache_key, now_ms, load);
                    let fut = attempt.fut.clone();
                    slot.push(attempt);
                    while slot.len() > self.opts.parallelism {
                        slot.remove(0);
                    }
                    spawned = Some(fut.clone());
                    fut
                }
            }
        };

        // Drive fresh attempts to completion even if every caller bails out
        // early on a stale value.
        if let Some(fresh) = spawned {
            tokio::spawn(fresh.map(|_| ()));
        }

        if self.opts.using_stale_value && fut.peek().is_none() {
            if let Some(stale) = self.find_stale(content_hash, epoch) {
                return Ok(stale);
            }
        }

        match fut.await {
            Ok(value) => Ok(value),
            Err(shared) => Err(RouterError::Shared(shared)),
        }
    }

    fn build_attempt<F, Fut>(&self, cache_key: CacheKey, now_ms: u64, load: F) -> Attempt<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, RouterError>> + Send + 'static,
    {
        let id = self.next_attempt.fetch_add(1, Ordering::Relaxed);
        let store = self.store.clone();
        let timeout = self.opts.request_timeout;
        let is_valid = self.opts.is_valid.clone();
        let persist = self.opts.persist.clone();
        let object_key = persist
            .as_ref()
            .map(|layer| layer.object_key(cache_key.0, now_ms));

        let base: BoxFuture<'static, Result<V, RouterError>> = match (&persist, &object_key) {
            (Some(layer), Some(key)) => {
                let live = load().boxed();
                let remote_store = layer.store.clone();
                let decode = layer.decode.clone();
                let key = key.clone();
                let remote = async move {
                    let raw = remote_store.fetch(&key).await?;
                    decode(&raw).ok_or_else(|| {
                        RouterError::RemoteCache("persisted value failed to decode".into())
                    })
                }
                .boxed();
                async move { take_first_fulfilled(vec![live, remote]).await }.boxed()
            }
            _ => load().boxed(),
        };

        let wrapped = async move {
            let result = match timeout {
                Some(t) => match tokio::time::timeout(t, base).await {
                    Ok(inner) => inner,
                    Err(_) => {
                        remove_attempt(&store, cache_key, id);
                        return Err(Arc::new(RouterError::Timeout(t.as_millis() as u64)));
                    }
                },
                None => base.await,
            };

            match result {
                Ok(value) => {
                    let valid = is_valid.as_ref().map(|f| f(&value)).unwrap_or(true);
                    if !valid {
                        remove_attempt(&store, cache_key, id);
                    } else if let (Some(layer), Some(key)) = (persist, object_key) {
                        if let Some(body) = (layer.encode)(&value) {
                            let remote = layer.store.clone();
                            tokio::spawn(async move {
                                if let Ok(true) = remote.exists(&key).await {
                                    return;
                                }
                                if let Err(e) = remote.put(&key, body).await {
                                    tracing::debug!(target: "memo", error = %e, "persist upload failed");
                                }
                            });
                        }
                    }
                    Ok(value)
                }
                Err(e) => {
                    remove_attempt(&store, cache_key, id);
                    Err(Arc::new(e))
                }
            }
        };

        Attempt {
            id,
            started: Instant::now(),
            fut: wrapped.boxed().shared(),
        }
    }

    /// Newest resolved value from an earlier epoch sharing the content key,
    /// bounded by `max_age` (enforced both here and by the store's lazy
    /// expiry).
    fn find_stale(&self, content_hash: u64, epoch: u64) -> Option<V> {
        let max_age = self.opts.max_age?;
        let ttl_ms = (self.opts.ttl.as_millis() as u64).max(1);
        let span = ((max_age.as_millis() as u64 / ttl_ms) + 1).max(1);
        let mut guard = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        for back in 1..=span {
            let Some(prior) = epoch.checked_sub(back) else {
                break;
            };
            if let Some(slot) = guard.get_mut(&(content_hash, prior)) {
                if let Some(value) = newest_resolved(slot) {
                    return Some(value);
                }
            }
        }
        None
    }
}

fn newest_resolved<V: Clone>(slot: &Slot<V>) -> Option<V> {
    slot.iter().rev().find_map(|attempt| {
        attempt
            .fut
            .peek()
            .and_then(|res| res.as_ref().ok())
            .cloned()
    })
}

fn remove_attempt<V: Clone + Send + Sync + 'static>(store: &Store<V>, key: CacheKey, id: u64) {
    let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
    let mut drop_key = false;
    if let Some(slot) = guard.get_mut(&key) {
        slot.retain(|a| a.id != id);
        drop_key = slot.is_empty();
    }
    if drop_key {
        guard.remove(&key);
    }
}

fn hash_of<K: Hash>(key: &K) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
