//! The vector index service: lifecycle, single-flight build, search.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::build::{build_snapshot, BuildOptions};
use super::file::read_index_file;
use super::snapshot::{IndexSnapshot, ScoredChunk};
use crate::embeddings::EmbeddingClient;
use crate::error::Result;
use crate::knowledge::KnowledgeStore;

/// Lifecycle of a [`VectorIndex`].
///
/// `Empty → Building → Ready`, and `Ready → Building` on rebuild. While a
/// rebuild runs the previous snapshot keeps serving searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexState {
    Empty,
    Building,
    Ready,
}

impl std::fmt::Display for IndexState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Building => write!(f, "building"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Point-in-time view of the index for status output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatus {
    pub state: IndexState,
    pub document_count: usize,
    pub embedding_dimension: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub builds_completed: u64,
}

/// Clears the building flag however the build future ends.
struct BuildingGuard<'a>(&'a AtomicBool);

impl<'a> BuildingGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BuildingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Embedding index over a knowledge store.
///
/// Built at most once at a time: concurrent callers that find the index
/// empty wait on the same build and share its snapshot. The Ready snapshot
/// is an `Arc` swapped in whole, so a search always sees one consistent
/// snapshot.
pub struct VectorIndex {
    client: Arc<EmbeddingClient>,
    store: RwLock<Arc<KnowledgeStore>>,
    options: BuildOptions,
    snapshot: RwLock<Option<Arc<IndexSnapshot>>>,
    building: AtomicBool,
    build_gate: tokio::sync::Mutex<()>,
    builds_completed: AtomicU64,
}

impl VectorIndex {
    #[must_use]
    pub fn new(client: Arc<EmbeddingClient>, store: Arc<KnowledgeStore>, options: BuildOptions) -> Self {
        Self {
            client,
            store: RwLock::new(store),
            options,
            snapshot: RwLock::new(None),
            building: AtomicBool::new(false),
            build_gate: tokio::sync::Mutex::new(()),
            builds_completed: AtomicU64::new(0),
        }
    }

    /// Client used for chunk vectors; queries must be embedded with it too.
    #[must_use]
    pub fn client(&self) -> &Arc<EmbeddingClient> {
        &self.client
    }

    #[must_use]
    pub fn state(&self) -> IndexState {
        if self.building.load(Ordering::SeqCst) {
            IndexState::Building
        } else if self.current().is_some() {
            IndexState::Ready
        } else {
            IndexState::Empty
        }
    }

    /// The Ready snapshot, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<IndexSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self) -> Arc<KnowledgeStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Ensure the index is Ready and return its snapshot.
    ///
    /// Returns immediately when Ready. Otherwise builds over the current
    /// store, or waits for an in-flight build and reuses its result.
    pub async fn build(&self) -> Arc<IndexSnapshot> {
        if let Some(snapshot) = self.current() {
            return snapshot;
        }

        let seen = self.builds_completed.load(Ordering::SeqCst);
        let _gate = self.build_gate.lock().await;

        if let Some(snapshot) = self.current() {
            if self.builds_completed.load(Ordering::SeqCst) != seen {
                debug!("Joined in-flight index build");
            }
            return snapshot;
        }

        let store = self.store();
        self.run_build(store).await
    }

    /// Build over `store` and replace the Ready snapshot.
    ///
    /// Waits for any in-flight build first. Searches keep using the old
    /// snapshot until the new one is swapped in.
    pub async fn rebuild(&self, store: Arc<KnowledgeStore>) -> Arc<IndexSnapshot> {
        let _gate = self.build_gate.lock().await;
        info!(documents = store.len(), "Rebuilding vector index");
        self.run_build(store).await
    }

    /// Must be called with the build gate held.
    async fn run_build(&self, store: Arc<KnowledgeStore>) -> Arc<IndexSnapshot> {
        let _building = BuildingGuard::set(&self.building);

        let snapshot = Arc::new(build_snapshot(store.all(), &self.client, &self.options).await);

        *self.store.write().unwrap_or_else(PoisonError::into_inner) = store;
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        self.builds_completed.fetch_add(1, Ordering::SeqCst);

        snapshot
    }

    /// Install a prebuilt snapshot as Ready (no provider calls).
    pub fn install(&self, snapshot: IndexSnapshot) -> Arc<IndexSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Load a precomputed index file and install it.
    ///
    /// # Errors
    ///
    /// Returns `IndexFile` if the file cannot be read, parsed, or has an
    /// unsupported version.
    pub fn load_file(&self, path: &Path) -> Result<Arc<IndexSnapshot>> {
        let store = self.store();
        let snapshot = read_index_file(path)?.into_snapshot(&store, path)?;
        info!(
            path = %path.display(),
            documents = snapshot.len(),
            dimension = snapshot.embedding_dimension,
            "Loaded precomputed index"
        );
        Ok(self.install(snapshot))
    }

    /// Rank chunks by similarity to `query`, building the index first if needed.
    pub async fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let snapshot = self.build().await;
        snapshot.search(query, top_k)
    }

    #[must_use]
    pub fn status(&self) -> IndexStatus {
        let snapshot = self.current();
        IndexStatus {
            state: self.state(),
            document_count: snapshot.as_ref().map_or(0, |s| s.len()),
            embedding_dimension: snapshot.as_ref().map_or(0, |s| s.embedding_dimension),
            built_at: snapshot.as_ref().map(|s| s.built_at),
            version: snapshot.as_ref().map(|s| s.version.clone()),
            builds_completed: self.builds_completed.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::testing::MockProvider;
    use crate::index::file::{write_index_file, IndexFile};
    use crate::knowledge::store::tests::chunk;
    use crate::knowledge::Category;
    use std::time::Duration;

    fn store(ids: &[&str]) -> Arc<KnowledgeStore> {
        Arc::new(
            KnowledgeStore::from_chunks(ids.iter().map(|id| chunk(id, id, Category::Governance)).collect())
                .unwrap(),
        )
    }

    fn options() -> BuildOptions {
        BuildOptions {
            batch_size: 2,
            batch_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_concurrent_builds_share_one_flight() {
        let provider = MockProvider::new(|_| Ok(vec![1.0, 0.0])).with_delay(Duration::from_millis(20));
        let calls = provider.calls();
        let index = VectorIndex::new(Arc::new(provider.into_client()), store(&["a", "b", "c"]), options());

        assert_eq!(index.state(), IndexState::Empty);
        let (first, second) = tokio::join!(index.build(), index.build());

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
        assert_eq!(index.status().builds_completed, 1);
        assert_eq!(index.state(), IndexState::Ready);
    }

    #[tokio::test]
    async fn test_concurrent_lazy_searches_build_once() {
        let provider = MockProvider::keyed(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])])
            .with_delay(Duration::from_millis(10));
        let calls = provider.calls();
        let index = VectorIndex::new(Arc::new(provider.into_client()), store(&["a", "b"]), options());

        let (x, y, z) = tokio::join!(
            index.search(&[1.0, 0.0], 1),
            index.search(&[0.0, 1.0], 1),
            index.search(&[1.0, 0.0], 2)
        );

        assert_eq!(x[0].chunk.id, "a");
        assert_eq!(y[0].chunk.id, "b");
        assert_eq!(z.len(), 2);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_build_with_no_successes_is_ready_and_empty() {
        let index = VectorIndex::new(Arc::new(MockProvider::failing().into_client()), store(&["a"]), options());

        assert!(index.search(&[1.0], 3).await.is_empty());
        assert_eq!(index.state(), IndexState::Ready);
        assert_eq!(index.status().document_count, 0);
    }

    #[tokio::test]
    async fn test_rebuild_swaps_snapshot_atomically() {
        let provider = MockProvider::keyed(&[
            ("a", vec![1.0, 0.0]),
            ("b", vec![0.0, 1.0]),
            ("c", vec![1.0, 0.1]),
        ]);
        let index = VectorIndex::new(Arc::new(provider.into_client()), store(&["a", "b"]), options());

        let old = index.build().await;
        let new = index.rebuild(store(&["b", "c"])).await;

        // Holders of the old snapshot still see the old data.
        assert_eq!(old.search(&[1.0, 0.0], 1)[0].chunk.id, "a");
        assert_eq!(new.search(&[1.0, 0.0], 1)[0].chunk.id, "c");
        assert_eq!(index.search(&[1.0, 0.0], 1).await[0].chunk.id, "c");
        assert_eq!(index.status().builds_completed, 2);
    }

    #[tokio::test]
    async fn test_load_file_installs_without_provider_calls() {
        let provider = MockProvider::failing();
        let calls = provider.calls();
        let store = store(&["a", "b"]);
        let index = VectorIndex::new(Arc::new(provider.into_client()), Arc::clone(&store), options());

        let prebuilt = IndexSnapshot::new(
            store
                .all()
                .iter()
                .zip([vec![1.0, 0.0], vec![0.0, 1.0]])
                .map(|(chunk, embedding)| crate::index::IndexEntry {
                    chunk: chunk.clone(),
                    embedding,
                })
                .collect(),
            2,
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        write_index_file(&path, &IndexFile::from_snapshot(&prebuilt)).unwrap();

        index.load_file(&path).unwrap();
        assert_eq!(index.state(), IndexState::Ready);
        assert_eq!(index.search(&[0.0, 1.0], 1).await[0].chunk.id, "b");
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(index.status().builds_completed, 0);
    }
}
