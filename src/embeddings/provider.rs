//! Embedding provider trait.
//!
//! Defines the interface that all embedding providers must implement.
//! Uses async methods for HTTP-based providers.

use std::future::Future;
use std::pin::Pin;

use super::types::{Embedding, ProviderInfo};
use crate::error::Result;

/// Trait for embedding providers.
///
/// Implemented by the Gemini provider and by test doubles.
pub trait EmbeddingProvider: Send + Sync {
    /// Get provider metadata.
    fn info(&self) -> ProviderInfo;

    /// Check if the provider is usable (credentials present).
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Generate embedding for a single text.
    ///
    /// The text is assumed to be already truncated to `info().max_chars`.
    fn generate_embedding(&self, text: &str) -> impl Future<Output = Result<Embedding>> + Send;
}

/// Boxed provider for dynamic dispatch.
///
/// Since the trait has async methods with `impl Future`, we need this wrapper
/// for runtime polymorphism.
pub struct BoxedProvider {
    inner: Box<dyn EmbeddingProviderBoxed + Send + Sync>,
}

/// Object-safe version of `EmbeddingProvider` for boxing.
pub trait EmbeddingProviderBoxed: Send + Sync {
    fn info(&self) -> ProviderInfo;
    fn is_available_boxed(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
    fn generate_embedding_boxed(&self, text: &str) -> Pin<Box<dyn Future<Output = Result<Embedding>> + Send + '_>>;
}

impl BoxedProvider {
    /// Create a new boxed provider.
    pub fn new<P: EmbeddingProvider + 'static>(provider: P) -> Self {
        Self {
            inner: Box::new(BoxedProviderWrapper(provider)),
        }
    }

    /// Get provider metadata.
    #[must_use]
    pub fn info(&self) -> ProviderInfo {
        self.inner.info()
    }

    /// Check if the provider is available.
    pub async fn is_available(&self) -> bool {
        self.inner.is_available_boxed().await
    }

    /// Generate embedding for a single text.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error.
    pub async fn generate_embedding(&self, text: &str) -> Result<Embedding> {
        self.inner.generate_embedding_boxed(text).await
    }
}

impl std::fmt::Debug for BoxedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedProvider").field("info", &self.info()).finish()
    }
}

/// Wrapper to implement `EmbeddingProviderBoxed` for any `EmbeddingProvider`.
struct BoxedProviderWrapper<P: EmbeddingProvider + 'static>(P);

impl<P: EmbeddingProvider + 'static> EmbeddingProviderBoxed for BoxedProviderWrapper<P> {
    fn info(&self) -> ProviderInfo {
        self.0.info()
    }

    fn is_available_boxed(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(self.0.is_available())
    }

    fn generate_embedding_boxed(&self, text: &str) -> Pin<Box<dyn Future<Output = Result<Embedding>> + Send + '_>> {
        // Owned copy so the future does not borrow the caller's text.
        let text_owned = text.to_string();
        Box::pin(async move { self.0.generate_embedding(&text_owned).await })
    }
}
