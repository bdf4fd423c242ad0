//! Embedding provider factory.
//!
//! Turns resolved configuration into a provider or a ready client.

use tracing::debug;

use super::client::EmbeddingClient;
use super::gemini::GeminiProvider;
use super::provider::BoxedProvider;
use crate::config::ResolvedConfig;
use crate::error::{Error, Result};

/// Create an embedding provider based on configuration.
///
/// Returns `None` if embeddings are disabled or no API key is configured.
#[must_use]
pub fn create_embedding_provider(config: &ResolvedConfig) -> Option<BoxedProvider> {
    if !config.embeddings_enabled {
        debug!("Embeddings disabled by configuration");
        return None;
    }

    let Some(api_key) = config.api_key.as_deref() else {
        debug!("No embedding API key configured");
        return None;
    };

    Some(BoxedProvider::new(GeminiProvider::with_config(
        &config.embed_endpoint,
        &config.embed_model,
        api_key,
    )))
}

/// Create a client with the configured per-call timeout.
#[must_use]
pub fn create_embedding_client(config: &ResolvedConfig) -> Option<EmbeddingClient> {
    create_embedding_provider(config)
        .map(|provider| EmbeddingClient::new(provider).with_timeout(config.embed_timeout))
}

/// Like [`create_embedding_client`], for commands that cannot run without one.
///
/// # Errors
///
/// Returns `Config` if embeddings are disabled, `MissingApiKey` if no key is set.
pub fn require_embedding_client(config: &ResolvedConfig) -> Result<EmbeddingClient> {
    if !config.embeddings_enabled {
        return Err(Error::Config(
            "Embeddings are disabled (RAGDESK_EMBEDDINGS_ENABLED=false)".into(),
        ));
    }
    create_embedding_client(config).ok_or(Error::MissingApiKey)
}
