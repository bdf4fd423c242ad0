//! Batched, rate-limited index build.

use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{info, warn};

use super::snapshot::{IndexEntry, IndexSnapshot};
use crate::config::{ResolvedConfig, DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE};
use crate::embeddings::EmbeddingClient;
use crate::knowledge::KnowledgeChunk;

/// Batch size and inter-batch delay for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Chunks embedded concurrently per batch (at least 1).
    pub batch_size: usize,
    /// Pause between consecutive batches.
    pub batch_delay: Duration,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
        }
    }
}

impl BuildOptions {
    #[must_use]
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            batch_delay: config.batch_delay,
        }
    }
}

/// Embed every chunk and assemble a snapshot.
///
/// Batches run one after another with `batch_delay` between them; chunks
/// inside a batch are embedded concurrently. A chunk whose embedding fails,
/// or whose vector length differs from the first successful vector, is
/// logged and left out.
pub async fn build_snapshot(
    chunks: &[KnowledgeChunk],
    client: &EmbeddingClient,
    options: &BuildOptions,
) -> IndexSnapshot {
    let started = Instant::now();
    let batch_size = options.batch_size.max(1);
    let total_batches = chunks.len().div_ceil(batch_size);

    info!(documents = chunks.len(), batch_size, batches = total_batches, "Building vector index");

    let mut entries = Vec::with_capacity(chunks.len());
    let mut dimension: Option<usize> = None;

    for (batch_idx, batch) in chunks.chunks(batch_size).enumerate() {
        if batch_idx > 0 && !options.batch_delay.is_zero() {
            tokio::time::sleep(options.batch_delay).await;
        }

        let texts: Vec<String> = batch.iter().map(KnowledgeChunk::embedding_text).collect();
        let results = join_all(texts.iter().map(|text| client.embed(text))).await;

        let indexed_before = entries.len();
        for (chunk, result) in batch.iter().zip(results) {
            let embedding = match result {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(chunk = %chunk.id, error = %e, "Excluding chunk from index");
                    continue;
                }
            };

            let expected = *dimension.get_or_insert(embedding.len());
            if embedding.len() != expected {
                warn!(
                    chunk = %chunk.id,
                    expected,
                    actual = embedding.len(),
                    "Excluding chunk with mismatched embedding dimension"
                );
                continue;
            }

            entries.push(IndexEntry {
                chunk: chunk.clone(),
                embedding,
            });
        }

        info!(
            batch = batch_idx + 1,
            of = total_batches,
            indexed = entries.len() - indexed_before,
            attempted = batch.len(),
            "Indexed batch"
        );
    }

    let dimension = dimension.unwrap_or(0);
    info!(
        indexed = entries.len(),
        documents = chunks.len(),
        dimension,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Vector index ready"
    );

    IndexSnapshot::new(entries, dimension)
}
