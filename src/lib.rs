//! ragdesk - retrieval-augmented context for an HR policy assistant
//!
//! This crate provides the retrieval engine behind the `ragdesk` CLI: it
//! ranks knowledge-base chunks against a question and renders them as
//! prompt context for a chat layer.
//!
//! # Architecture
//!
//! - [`knowledge`] - Knowledge chunks and the read-only store
//! - [`embeddings`] - Embedding provider (Gemini), cache and client
//! - [`similarity`] - Cosine similarity
//! - [`index`] - Vector index: single-flight batched build, search, index file
//! - [`retriever`] - Retrieval façade with store-order fallback
//! - [`config`] - Configuration management
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod index;
pub mod knowledge;
pub mod retriever;
pub mod similarity;

pub use error::{Error, Result};
pub use retriever::{RetrievalOutcome, Retriever, NO_INFORMATION_FOUND};
