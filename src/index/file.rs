//! Precomputed index file.
//!
//! A JSON document produced by `ragdesk index build` and loaded at startup
//! as the Ready index, so no provider calls are needed for chunk vectors.
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "generatedAt": "2026-01-01T00:00:00Z",
//!   "documentCount": 2,
//!   "embeddingDimension": 768,
//!   "entries": [ { "id": "...", "title": "...", "content": "...", "tags": [], "embedding": [] } ]
//! }
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::snapshot::{IndexEntry, IndexSnapshot};
use crate::embeddings::Embedding;
use crate::error::{Error, Result};
use crate::knowledge::KnowledgeStore;

/// Version written to new files. Files with another major version are rejected.
pub const INDEX_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFile {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub document_count: usize,
    pub embedding_dimension: usize,
    pub entries: Vec<IndexFileEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexFileEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    /// The chunk's keywords.
    #[serde(default)]
    pub tags: Vec<String>,
    pub embedding: Embedding,
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

impl IndexFile {
    #[must_use]
    pub fn from_snapshot(snapshot: &IndexSnapshot) -> Self {
        Self {
            version: INDEX_SCHEMA_VERSION.to_string(),
            generated_at: snapshot.built_at,
            document_count: snapshot.len(),
            embedding_dimension: snapshot.embedding_dimension,
            entries: snapshot
                .entries
                .iter()
                .map(|entry| IndexFileEntry {
                    id: entry.chunk.id.clone(),
                    title: entry.chunk.title.clone(),
                    content: entry.chunk.content.clone(),
                    tags: entry.chunk.keywords.clone(),
                    embedding: entry.embedding.clone(),
                })
                .collect(),
        }
    }

    /// Resolve entries against `store` and produce a snapshot in store order.
    ///
    /// Entries whose id is unknown, whose title or content no longer match
    /// the store, or whose vector length differs from `embeddingDimension`
    /// are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `IndexFile` if the file's major version is not supported.
    pub fn into_snapshot(self, store: &KnowledgeStore, path: &Path) -> Result<IndexSnapshot> {
        if major(&self.version) != major(INDEX_SCHEMA_VERSION) {
            return Err(Error::IndexFile {
                path: path.to_path_buf(),
                message: format!(
                    "unsupported index version {} (expected {INDEX_SCHEMA_VERSION})",
                    self.version
                ),
            });
        }

        let dimension = self.embedding_dimension;
        let mut by_id: HashMap<String, IndexFileEntry> = HashMap::with_capacity(self.entries.len());
        for entry in self.entries {
            if store.get(&entry.id).is_none() {
                warn!(id = %entry.id, "Skipping index entry for unknown chunk");
                continue;
            }
            if entry.embedding.len() != dimension {
                warn!(
                    id = %entry.id,
                    expected = dimension,
                    actual = entry.embedding.len(),
                    "Skipping index entry with wrong dimension"
                );
                continue;
            }
            by_id.insert(entry.id.clone(), entry);
        }

        let mut entries = Vec::with_capacity(by_id.len());
        for chunk in store.all() {
            let Some(entry) = by_id.remove(&chunk.id) else {
                continue;
            };
            if entry.title != chunk.title || entry.content != chunk.content {
                warn!(id = %chunk.id, "Skipping stale index entry (chunk changed since build)");
                continue;
            }
            entries.push(IndexEntry {
                chunk: chunk.clone(),
                embedding: entry.embedding,
            });
        }

        Ok(IndexSnapshot {
            embedding_dimension: if entries.is_empty() { 0 } else { dimension },
            entries,
            built_at: self.generated_at,
            version: self.version,
        })
    }
}

/// Write an index file atomically (temp file, fsync, rename).
///
/// # Errors
///
/// Returns `IndexFile` if the file cannot be serialized or written.
pub fn write_index_file(path: &Path, file: &IndexFile) -> Result<()> {
    let to_error = |message: String| Error::IndexFile {
        path: path.to_path_buf(),
        message,
    };

    let content = serde_json::to_string(file).map_err(|e| to_error(e.to_string()))?;
    atomic_write(path, &content).map_err(|e| to_error(e.to_string()))
}

fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)
}

/// Read and parse an index file.
///
/// # Errors
///
/// Returns `IndexFile` if the file is missing, unreadable, or malformed.
pub fn read_index_file(path: &Path) -> Result<IndexFile> {
    let to_error = |message: String| Error::IndexFile {
        path: path.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(path).map_err(|e| to_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| to_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::store::tests::chunk;
    use crate::knowledge::{Category, KnowledgeChunk};

    fn store() -> KnowledgeStore {
        KnowledgeStore::from_chunks(vec![
            chunk("a", "Vacation sale", Category::Vacation),
            chunk("b", "Remote work", Category::RemoteWork),
        ])
        .unwrap()
    }

    fn snapshot_of(store: &KnowledgeStore) -> IndexSnapshot {
        let entries = store
            .all()
            .iter()
            .zip([vec![1.0, 0.0], vec![0.0, 1.0]])
            .map(|(chunk, embedding)| IndexEntry {
                chunk: chunk.clone(),
                embedding,
            })
            .collect();
        IndexSnapshot::new(entries, 2)
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let file = IndexFile::from_snapshot(&snapshot_of(&store()));
        let json = serde_json::to_value(&file).unwrap();

        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["documentCount"], 2);
        assert_eq!(json["embeddingDimension"], 2);
        assert!(json["generatedAt"].is_string());
        assert_eq!(json["entries"][0]["id"], "a");
        assert!(json["entries"][0]["tags"].is_array());
    }

    #[test]
    fn test_write_then_load_restores_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("index.json");
        let store = store();
        let snapshot = snapshot_of(&store);

        write_index_file(&path, &IndexFile::from_snapshot(&snapshot)).unwrap();
        let loaded = read_index_file(&path).unwrap().into_snapshot(&store, &path).unwrap();

        assert_eq!(loaded.entries, snapshot.entries);
        assert_eq!(loaded.embedding_dimension, 2);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_unknown_stale_and_wrong_dimension_entries_skipped() {
        let store = store();
        let mut file = IndexFile::from_snapshot(&snapshot_of(&store));
        file.entries[0].content = "outdated".into();
        file.entries.push(IndexFileEntry {
            id: "ghost".into(),
            title: "Ghost".into(),
            content: "Gone".into(),
            tags: vec![],
            embedding: vec![1.0, 1.0],
        });
        file.entries[1].embedding = vec![0.0, 1.0, 0.0];

        let snapshot = file.into_snapshot(&store, Path::new("index.json")).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.embedding_dimension, 0);
    }

    #[test]
    fn test_entries_reordered_to_store_order() {
        let store = store();
        let mut file = IndexFile::from_snapshot(&snapshot_of(&store));
        file.entries.reverse();

        let snapshot = file.into_snapshot(&store, Path::new("index.json")).unwrap();
        let ids: Vec<&str> = snapshot.entries.iter().map(|e| e.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_unsupported_major_version_rejected() {
        let store = store();
        let mut file = IndexFile::from_snapshot(&snapshot_of(&store));
        file.version = "2.0.0".into();

        let err = file.into_snapshot(&store, Path::new("index.json")).unwrap_err();
        assert!(matches!(err, Error::IndexFile { .. }));
    }

    #[test]
    fn test_missing_file_is_index_file_error() {
        let err = read_index_file(Path::new("/nonexistent/ragdesk/index.json")).unwrap_err();
        assert!(matches!(err, Error::IndexFile { .. }));
    }

    #[test]
    fn test_tags_carry_keywords() {
        let mut with_keywords: KnowledgeChunk = chunk("a", "Vacation sale", Category::Vacation);
        with_keywords.keywords = vec!["sell".into()];
        let snapshot = IndexSnapshot::new(
            vec![IndexEntry {
                chunk: with_keywords,
                embedding: vec![1.0],
            }],
            1,
        );

        assert_eq!(IndexFile::from_snapshot(&snapshot).entries[0].tags, vec!["sell"]);
    }
}
