//! Retrieval façade.
//!
//! The one object the chat layer talks to. It embeds the query, searches
//! the vector index and, when either step cannot produce results, falls
//! back to the first chunks of the knowledge store so callers always get
//! some context.

pub mod context;
pub mod keywords;
pub mod outcome;

pub use context::{format_context, NO_INFORMATION_FOUND};
pub use keywords::rank_by_keywords;
pub use outcome::{DegradedReason, RetrievalOutcome};

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::config::ResolvedConfig;
use crate::embeddings::{create_embedding_client, EmbeddingClient};
use crate::error::{Error, Result};
use crate::index::{BuildOptions, IndexStatus, ScoredChunk, VectorIndex};
use crate::knowledge::{Category, KnowledgeChunk, KnowledgeStore};

/// Retrieval service. Construct once and share (`Arc<Retriever>`).
pub struct Retriever {
    store: RwLock<Arc<KnowledgeStore>>,
    index: Option<VectorIndex>,
}

impl Retriever {
    /// Without a client every `retrieve` is degraded.
    #[must_use]
    pub fn new(store: Arc<KnowledgeStore>, client: Option<EmbeddingClient>, options: BuildOptions) -> Self {
        let index = client.map(|client| VectorIndex::new(Arc::new(client), Arc::clone(&store), options));
        Self {
            store: RwLock::new(store),
            index,
        }
    }

    /// Build a retriever from resolved configuration.
    ///
    /// If the index file (configured, or `~/.ragdesk/index.json`) exists, it
    /// is loaded as the Ready index; otherwise the index builds lazily.
    ///
    /// # Errors
    ///
    /// Returns `IndexFile` if the configured index file exists but cannot be
    /// loaded.
    pub fn from_config(config: &ResolvedConfig, store: Arc<KnowledgeStore>) -> Result<Self> {
        let retriever = Self::new(store, create_embedding_client(config), BuildOptions::from_config(config));

        if let (Some(index), Some(path)) = (&retriever.index, config.index_file()) {
            if path.exists() {
                index.load_file(&path)?;
            } else if config.index_path.is_some() {
                warn!(path = %path.display(), "Index file not found, index will be built on first query");
            } else {
                debug!(path = %path.display(), "No index file at default location");
            }
        }

        Ok(retriever)
    }

    /// Current knowledge store.
    #[must_use]
    pub fn store(&self) -> Arc<KnowledgeStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }

    /// Top-`top_k` chunks for `query`.
    ///
    /// `top_k == 0` asks for nothing and returns an empty ranked result.
    ///
    /// Ranked by cosine similarity when the query can be embedded and the
    /// index has entries; otherwise the first `top_k` chunks in store order,
    /// tagged with the reason.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> RetrievalOutcome {
        if top_k == 0 {
            return RetrievalOutcome::Ranked { results: Vec::new() };
        }

        let Some(index) = &self.index else {
            return self.degraded(top_k, DegradedReason::NoProvider);
        };

        let query_embedding = match index.client().embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => return self.degraded(top_k, DegradedReason::Provider(e.to_string())),
        };

        let results = index.search(&query_embedding, top_k).await;
        if results.is_empty() {
            return self.degraded(top_k, DegradedReason::EmptyIndex);
        }

        RetrievalOutcome::Ranked { results }
    }

    fn degraded(&self, top_k: usize, reason: DegradedReason) -> RetrievalOutcome {
        warn!(%reason, "Semantic retrieval unavailable, using store order");
        let chunks = self.store().all().iter().take(top_k).cloned().collect();
        RetrievalOutcome::Degraded { chunks, reason }
    }

    /// Retrieve and render the result for a prompt.
    ///
    /// Never empty: no chunks yields [`NO_INFORMATION_FOUND`].
    pub async fn get_retrieval_context(&self, query: &str, top_k: usize) -> String {
        let outcome = self.retrieve(query, top_k).await;
        format_context(&outcome.chunks())
    }

    /// First `top_k` chunks of `category`, in store order.
    #[must_use]
    pub fn retrieve_by_category(&self, category: Category, top_k: usize) -> Vec<KnowledgeChunk> {
        self.store().by_category(category).take(top_k).cloned().collect()
    }

    /// Rank chunks by literal keyword overlap with `query`.
    #[must_use]
    pub fn retrieve_by_keywords(&self, query: &str, top_k: usize) -> Vec<ScoredChunk> {
        rank_by_keywords(self.store().all(), query, top_k)
    }

    /// Replace the knowledge store and rebuild the index over it.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if there is no embedding provider to build with.
    pub async fn rebuild(&self, store: Arc<KnowledgeStore>) -> Result<IndexStatus> {
        let Some(index) = &self.index else {
            return Err(Error::MissingApiKey);
        };

        index.rebuild(Arc::clone(&store)).await;
        *self.store.write().unwrap_or_else(PoisonError::into_inner) = store;
        Ok(index.status())
    }

    /// Index status, or `None` when no provider is configured.
    #[must_use]
    pub fn index_status(&self) -> Option<IndexStatus> {
        self.index.as_ref().map(VectorIndex::status)
    }
}
