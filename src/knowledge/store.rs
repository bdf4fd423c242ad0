//! Read-only knowledge store.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::error::{Error, Result};

use super::types::{Category, KnowledgeChunk};

/// Dataset compiled into the binary.
const BUNDLED_DATASET: &str = include_str!("../../data/knowledge_base.json");

/// Ordered, immutable collection of knowledge chunks.
///
/// Store order is meaningful: it is the tie-break order for ranking and the
/// order of the degraded fallback.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    chunks: Vec<KnowledgeChunk>,
}

impl KnowledgeStore {
    /// Load the dataset bundled with this build.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled dataset fails validation.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DATASET)
    }

    /// Parse a JSON array of chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the chunks are invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let chunks: Vec<KnowledgeChunk> = serde_json::from_str(json)?;
        Self::from_chunks(chunks)
    }

    /// Load a dataset file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build a store from chunks, validating ids and content.
    ///
    /// Keywords are normalised to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` on a duplicate id, an empty id, or empty content.
    pub fn from_chunks(mut chunks: Vec<KnowledgeChunk>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(chunks.len());

        for chunk in &mut chunks {
            if chunk.id.trim().is_empty() {
                return Err(Error::InvalidArgument("knowledge chunk with empty id".into()));
            }
            if !seen.insert(chunk.id.clone()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate knowledge chunk id: {}",
                    chunk.id
                )));
            }
            if chunk.content.trim().is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "knowledge chunk {} has empty content",
                    chunk.id
                )));
            }
            for keyword in &mut chunk.keywords {
                *keyword = keyword.trim().to_lowercase();
            }
            chunk.keywords.retain(|k| !k.is_empty());
        }

        Ok(Self { chunks })
    }

    /// All chunks in store order.
    #[must_use]
    pub fn all(&self) -> &[KnowledgeChunk] {
        &self.chunks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Look up a chunk by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&KnowledgeChunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    /// Chunks of one category, in store order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &KnowledgeChunk> {
        self.chunks.iter().filter(move |c| c.category == category)
    }

    /// Every distinct keyword across the store, lowercase.
    #[must_use]
    pub fn all_keywords(&self) -> BTreeSet<String> {
        self.chunks
            .iter()
            .flat_map(|c| c.keywords.iter().cloned())
            .collect()
    }
}
