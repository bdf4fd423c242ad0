//! Knowledge store: the static, ordered set of retrievable HR rule chunks.
//!
//! The bundled dataset lives in `data/knowledge_base.json` and is compiled
//! into the binary. A different dataset can be loaded from disk with
//! [`KnowledgeStore::from_path`]; either way the store is read-only once
//! constructed.

pub mod store;
pub mod types;

pub use store::KnowledgeStore;
pub use types::{Audience, Category, KnowledgeChunk};
