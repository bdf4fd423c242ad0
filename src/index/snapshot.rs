//! Immutable Ready-state index data and the exhaustive scan.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::file::INDEX_SCHEMA_VERSION;
use crate::embeddings::Embedding;
use crate::knowledge::KnowledgeChunk;
use crate::similarity::cosine_similarity;

/// A chunk paired with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub chunk: KnowledgeChunk,
    pub embedding: Embedding,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    #[serde(flatten)]
    pub chunk: KnowledgeChunk,
    pub score: f32,
}

/// Entries of a completed build, in knowledge-store order.
///
/// Never mutated after construction; replaced wholesale on rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSnapshot {
    pub entries: Vec<IndexEntry>,
    /// Length shared by every entry's embedding (0 when there are no entries).
    pub embedding_dimension: usize,
    pub built_at: DateTime<Utc>,
    pub version: String,
}

impl IndexSnapshot {
    #[must_use]
    pub fn new(entries: Vec<IndexEntry>, embedding_dimension: usize) -> Self {
        Self {
            entries,
            embedding_dimension,
            built_at: Utc::now(),
            version: INDEX_SCHEMA_VERSION.to_string(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score every entry against `query` and return the best `top_k`.
    ///
    /// Scores are non-increasing; equal scores keep store order. An empty
    /// snapshot or `top_k == 0` yields an empty result.
    #[must_use]
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        if top_k == 0 || self.entries.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(query, &entry.embedding)))
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::store::tests::chunk;
    use crate::knowledge::Category;

    fn snapshot(vectors: &[(&str, Vec<f32>)]) -> IndexSnapshot {
        let entries = vectors
            .iter()
            .map(|(id, v)| IndexEntry {
                chunk: chunk(id, id, Category::Vacation),
                embedding: v.clone(),
            })
            .collect();
        IndexSnapshot::new(entries, 2)
    }

    fn ids(hits: &[ScoredChunk]) -> Vec<&str> {
        hits.iter().map(|h| h.chunk.id.as_str()).collect()
    }

    #[test]
    fn test_search_ranks_by_similarity() {
        let snap = snapshot(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]);
        let hits = snap.search(&[0.9, 0.1], 1);

        assert_eq!(ids(&hits), vec!["a"]);
        assert!((hits[0].score - 0.9939).abs() < 1e-3);
    }

    #[test]
    fn test_search_never_exceeds_top_k_and_returns_all_when_larger() {
        let snap = snapshot(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0]), ("c", vec![1.0, 1.0])]);
        assert_eq!(snap.search(&[1.0, 0.0], 2).len(), 2);
        assert_eq!(snap.search(&[1.0, 0.0], 10).len(), 3);
        assert!(snap.search(&[1.0, 0.0], 0).is_empty());
    }

    #[test]
    fn test_scores_non_increasing_and_ties_keep_store_order() {
        let snap = snapshot(&[
            ("a", vec![0.0, 1.0]),
            ("b", vec![1.0, 0.0]),
            ("c", vec![2.0, 0.0]),
            ("d", vec![1.0, 1.0]),
        ]);
        let hits = snap.search(&[1.0, 0.0], 4);

        assert_eq!(ids(&hits), vec!["b", "c", "d", "a"]);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_empty_snapshot_returns_empty() {
        let snap = IndexSnapshot::new(vec![], 0);
        assert!(snap.search(&[1.0], 3).is_empty());
    }
}
