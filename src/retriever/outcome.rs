//! Retrieval results, ranked or degraded.

use serde::Serialize;

use crate::index::ScoredChunk;
use crate::knowledge::KnowledgeChunk;

/// Why a retrieval fell back to store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradedReason {
    /// No embedding provider is configured.
    NoProvider,
    /// Embedding the query failed.
    Provider(String),
    /// The index holds no entries.
    EmptyIndex,
}

impl std::fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoProvider => write!(f, "no embedding provider configured"),
            Self::Provider(message) => write!(f, "query embedding failed: {message}"),
            Self::EmptyIndex => write!(f, "vector index is empty"),
        }
    }
}

/// Result of [`Retriever::retrieve`](super::Retriever::retrieve).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetrievalOutcome {
    /// Chunks ranked by similarity, best first.
    Ranked { results: Vec<ScoredChunk> },
    /// The first chunks of the store, in store order.
    Degraded {
        chunks: Vec<KnowledgeChunk>,
        reason: DegradedReason,
    },
}

impl RetrievalOutcome {
    /// The returned chunks in result order.
    #[must_use]
    pub fn chunks(&self) -> Vec<&KnowledgeChunk> {
        match self {
            Self::Ranked { results } => results.iter().map(|r| &r.chunk).collect(),
            Self::Degraded { chunks, .. } => chunks.iter().collect(),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ranked { results } => results.len(),
            Self::Degraded { chunks, .. } => chunks.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
