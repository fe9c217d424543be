//! Pluggable memoization for tokenization passes.
//!
//! The engine never owns a cache. It asks a [`TokenCache`] for a stored result
//! under a fingerprint key and hands the fresh result back on a miss. Get and
//! set are independent calls; implementations shared across threads handle
//! their own locking.

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use rustc_hash::FxHasher;

use super::token::Token;

/// Default capacity of [`LruTokenCache`].
pub const DEFAULT_CACHE_SIZE: usize = 4096;

/// Key-value store for tokenization results.
pub trait TokenCache: Send + Sync {
    /// Stored result for `key`, if any.
    fn get(&self, key: &str) -> Option<Vec<Token>>;

    /// Store the result computed for `key`.
    fn set(&self, key: &str, tokens: &[Token]);
}

/// Cache that never hits and stores nothing. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl TokenCache for NoCache {
    fn get(&self, _key: &str) -> Option<Vec<Token>> {
        None
    }

    fn set(&self, _key: &str, _tokens: &[Token]) {}
}

type GetFn = Box<dyn Fn(&str) -> Option<Vec<Token>> + Send + Sync>;
type SetFn = Box<dyn Fn(&str, &[Token]) + Send + Sync>;

/// Cache backed by a pair of caller closures.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::{Arc, Mutex};
/// use tokenflow::{FnCache, Token, Tokenizer};
///
/// let store: Arc<Mutex<HashMap<String, Vec<Token>>>> = Arc::default();
/// let (get_store, set_store) = (store.clone(), store.clone());
/// let cache = FnCache::new(
///     move |key| get_store.lock().ok()?.get(key).cloned(),
///     move |key, tokens| {
///         if let Ok(mut map) = set_store.lock() {
///             map.insert(key.to_string(), tokens.to_vec());
///         }
///     },
/// );
///
/// let tokenize = Tokenizer::with_cache(cache);
/// tokenize.words().run("a b").unwrap();
/// assert_eq!(store.lock().unwrap().len(), 1);
/// ```
pub struct FnCache {
    get: GetFn,
    set: SetFn,
}

impl FnCache {
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&str) -> Option<Vec<Token>> + Send + Sync + 'static,
        S: Fn(&str, &[Token]) + Send + Sync + 'static,
    {
        Self {
            get: Box::new(get),
            set: Box::new(set),
        }
    }
}

impl TokenCache for FnCache {
    fn get(&self, key: &str) -> Option<Vec<Token>> {
        (self.get)(key)
    }

    fn set(&self, key: &str, tokens: &[Token]) {
        (self.set)(key, tokens)
    }
}

/// Bounded in-process cache with least-recently-used eviction.
///
/// Keys are reduced to a 64-bit `FxHasher` hash, so very long fingerprints
/// cost nothing to keep around. A hash collision returns the other entry's
/// tokens.
pub struct LruTokenCache {
    entries: Mutex<LruCache<u64, Vec<Token>>>,
    capacity: usize,
}

impl LruTokenCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(size)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored result.
    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    /// Lock the entries, recovering them if another thread panicked.
    fn lock_entries(&self) -> MutexGuard<'_, LruCache<u64, Vec<Token>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn hash_key(key: &str) -> u64 {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for LruTokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl TokenCache for LruTokenCache {
    fn get(&self, key: &str) -> Option<Vec<Token>> {
        let hash = Self::hash_key(key);
        self.lock_entries().get(&hash).cloned()
    }

    fn set(&self, key: &str, tokens: &[Token]) {
        let hash = Self::hash_key(key);
        self.lock_entries().put(hash, tokens.to_vec());
    }
}
