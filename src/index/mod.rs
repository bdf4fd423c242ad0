//! Vector index.
//!
//! - [`VectorIndex`]: the long-lived service (state, single-flight build, search)
//! - [`build_snapshot`]: batched embedding of a chunk list
//! - [`IndexSnapshot`]: the immutable Ready data and the exhaustive scan
//! - [`IndexFile`]: the precomputed on-disk form

pub mod build;
pub mod file;
pub mod snapshot;
pub mod vector_index;

pub use build::{build_snapshot, BuildOptions};
pub use file::{read_index_file, write_index_file, IndexFile, IndexFileEntry, INDEX_SCHEMA_VERSION};
pub use snapshot::{IndexEntry, IndexSnapshot, ScoredChunk};
pub use vector_index::{IndexState, IndexStatus, VectorIndex};
