//! Memoised synonym lookup.
//!
//! [`SynonymResolver`] wraps a [`LexicalDatabase`] with an LRU cache keyed by
//! word. A word's synonyms are the lemmas of every synset it belongs to,
//! lowercased, with `_` between the words of a multi-word lemma replaced by a
//! single space. The word's own lemma is part of its synset and is kept.
//!
//! The cache sits behind a `Mutex` so a shared engine stays `Send + Sync`;
//! the lock is held only for the cache probe and insert, never across the
//! database query.

use crate::lexicon::LexicalDatabase;
use lru::LruCache;
use serde::Serialize;
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

/// Snapshot of the resolver cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Words currently cached.
    pub entries: usize,
    /// Maximum entries before eviction; `None` when unbounded.
    pub capacity: Option<usize>,
    pub hits: u64,
    pub misses: u64,
}

struct SynonymCache {
    entries: LruCache<String, BTreeSet<String>>,
    bounded: bool,
    hits: u64,
    misses: u64,
}

/// Word → synonym set resolver with an LRU memo.
pub struct SynonymResolver {
    database: Option<Arc<dyn LexicalDatabase>>,
    cache: Mutex<SynonymCache>,
}

impl SynonymResolver {
    /// Create a resolver over `database`. `capacity == 0` disables eviction.
    /// Without a database every word resolves to the empty set.
    pub fn new(database: Option<Arc<dyn LexicalDatabase>>, capacity: usize) -> Self {
        let (entries, bounded) = match NonZeroUsize::new(capacity) {
            Some(cap) => (LruCache::new(cap), true),
            None => (LruCache::unbounded(), false),
        };
        Self {
            database,
            cache: Mutex::new(SynonymCache {
                entries,
                bounded,
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Whether a lexical database is attached.
    pub fn is_enabled(&self) -> bool {
        self.database.is_some()
    }

    /// Synonyms of `word`. Unknown words yield an empty set.
    pub fn synonyms_of(&self, word: &str) -> BTreeSet<String> {
        let Some(database) = &self.database else {
            return BTreeSet::new();
        };

        {
            let mut cache = self.lock();
            if let Some(found) = cache.entries.get(word).cloned() {
                cache.hits += 1;
                return found;
            }
            cache.misses += 1;
        }

        let synonyms: BTreeSet<String> = database
            .synsets(word)
            .into_iter()
            .flat_map(|synset| synset.lemmas)
            .map(|lemma| lemma.replace('_', " ").to_lowercase())
            .collect();
        trace!("synonyms of '{}' via {}: {}", word, database.name(), synonyms.len());

        self.lock().entries.put(word.to_string(), synonyms.clone());
        synonyms
    }

    pub fn stats(&self) -> CacheStats {
        let cache = self.lock();
        CacheStats {
            entries: cache.entries.len(),
            capacity: cache.bounded.then(|| cache.entries.cap().get()),
            hits: cache.hits,
            misses: cache.misses,
        }
    }

    /// Drop every cached entry. Counters are kept.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    // A panic while holding the lock cannot leave the cache inconsistent,
    // so a poisoned lock is recovered.
    fn lock(&self) -> MutexGuard<'_, SynonymCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SynonymResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynonymResolver")
            .field("database", &self.database.as_ref().map(|db| db.name().to_string()))
            .field("stats", &self.stats())
            .finish()
    }
}
