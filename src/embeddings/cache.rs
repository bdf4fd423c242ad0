//! Process-lifetime embedding cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::types::Embedding;

/// Characters of input text that form the cache key.
pub const CACHE_KEY_PREFIX_CHARS: usize = 100;

/// Text-prefix keyed cache. Entries are never evicted.
///
/// Two texts sharing their first 100 characters share an entry.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: Mutex<HashMap<String, Embedding>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Counters for `embeddings test` and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl EmbeddingCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for `text`: `"embed:"` followed by its first 100 characters.
    #[must_use]
    pub fn key_for(text: &str) -> String {
        let prefix: String = text.chars().take(CACHE_KEY_PREFIX_CHARS).collect();
        format!("embed:{prefix}")
    }

    /// Look up `text`, counting the hit or miss.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Embedding> {
        let key = Self::key_for(text);
        let found = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store `embedding` unless an entry for the key already exists.
    ///
    /// Returns the value that ends up cached, so racing writers agree.
    pub fn insert_if_absent(&self, text: &str, embedding: Embedding) -> Embedding {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(Self::key_for(text))
            .or_insert(embedding)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
