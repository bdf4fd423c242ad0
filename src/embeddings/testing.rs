//! In-crate provider doubles for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::provider::{BoxedProvider, EmbeddingProvider};
use super::types::{Embedding, ProviderInfo};
use super::EmbeddingClient;
use crate::error::{Error, Result};

type Responder = Box<dyn Fn(&str) -> Result<Embedding> + Send + Sync>;

/// Provider whose answers come from a closure; counts calls.
pub(crate) struct MockProvider {
    responder: Responder,
    calls: Arc<AtomicUsize>,
    delay: Duration,
    max_chars: usize,
}

impl MockProvider {
    pub(crate) fn new(responder: impl Fn(&str) -> Result<Embedding> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
            max_chars: 2000,
        }
    }

    /// Answer with the vector of the first key `text` starts with; fail otherwise.
    pub(crate) fn keyed(pairs: &[(&str, Vec<f32>)]) -> Self {
        let pairs: Vec<(String, Vec<f32>)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();

        Self::new(move |text| {
            pairs
                .iter()
                .find(|(key, _)| text.starts_with(key.as_str()))
                .map(|(_, v)| v.clone())
                .ok_or_else(|| Error::Provider(format!("no vector for {text:?}")))
        })
    }

    pub(crate) fn failing() -> Self {
        Self::new(|_| Err(Error::Provider("service unavailable".into())))
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub(crate) fn into_client(self) -> EmbeddingClient {
        EmbeddingClient::new(BoxedProvider::new(self))
    }
}

impl EmbeddingProvider for MockProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "mock".to_string(),
            model: "mock-embedder".to_string(),
            dimensions: 0,
            max_chars: self.max_chars,
        }
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate_embedding(&self, text: &str) -> Result<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.responder)(text)
    }
}
