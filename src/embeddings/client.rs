//! Embedding client: truncation, caching and a bounded provider call.

use std::time::Duration;

use tracing::debug;

use super::cache::EmbeddingCache;
use super::provider::BoxedProvider;
use super::types::{Embedding, ProviderInfo};
use crate::error::{Error, Result};

/// Return the longest prefix of `text` holding at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Turns text into embeddings through one provider, with a shared cache.
///
/// Safe to share across tasks (`Arc<EmbeddingClient>`).
#[derive(Debug)]
pub struct EmbeddingClient {
    provider: BoxedProvider,
    cache: EmbeddingCache,
    max_chars: usize,
    timeout: Option<Duration>,
}

impl EmbeddingClient {
    /// Wrap `provider`, truncating input to its advertised `max_chars`.
    #[must_use]
    pub fn new(provider: BoxedProvider) -> Self {
        let max_chars = provider.info().max_chars;
        Self {
            provider,
            cache: EmbeddingCache::new(),
            max_chars,
            timeout: None,
        }
    }

    /// Bound each provider call. A timed-out call fails with `ProviderTimeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    #[must_use]
    pub fn info(&self) -> ProviderInfo {
        self.provider.info()
    }

    #[must_use]
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    #[must_use]
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Embed `text`.
    ///
    /// The text is truncated to `max_chars` characters, then looked up in the
    /// cache. On a miss the provider is called once (no retry) and a
    /// successful result is cached.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if the truncated text is blank (no provider call).
    /// - `ProviderTimeout` if the call exceeds the configured timeout.
    /// - `Provider` on any provider failure or an empty vector.
    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        let truncated = truncate_chars(text, self.max_chars);
        if truncated.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        if let Some(embedding) = self.cache.get(truncated) {
            debug!(chars = truncated.chars().count(), "Embedding cache hit");
            return Ok(embedding);
        }
        debug!(chars = truncated.chars().count(), "Embedding cache miss");

        let call = self.provider.generate_embedding(truncated);
        let embedding = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| Error::ProviderTimeout { secs: limit.as_secs() })??,
            None => call.await?,
        };

        if embedding.is_empty() {
            return Err(Error::Provider("provider returned an empty vector".into()));
        }

        Ok(self.cache.insert_if_absent(truncated, embedding))
    }
}
