//! Embedding generation for semantic retrieval.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ Index / Retriever│
//! └────────┬─────────┘
//!          │ embed(text)
//!          ▼
//! ┌──────────────────┐
//! │ EmbeddingClient  │  truncate → cache → bounded call
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  BoxedProvider   │  ← created by the factory
//! └────────┬─────────┘
//!          ▼
//!   Gemini embedContent (HTTP)
//! ```
//!
//! Settings come from [`crate::config`]; without an API key no provider is
//! created and retrieval runs in its degraded, store-order mode.

pub mod cache;
pub mod client;
pub mod factory;
pub mod gemini;
pub mod provider;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheStats, EmbeddingCache};
pub use client::{truncate_chars, EmbeddingClient};
pub use factory::{create_embedding_client, create_embedding_provider, require_embedding_client};
pub use gemini::GeminiProvider;
pub use provider::{BoxedProvider, EmbeddingProvider};
pub use types::{gemini_models, Embedding, ModelConfig, ProviderInfo};
