//! Gemini `embedContent` provider.
//!
//! One HTTP POST per text:
//!
//! ```text
//! POST {endpoint}/models/{model}:embedContent
//! x-goog-api-key: <key>
//! { "model": "models/{model}", "content": { "parts": [ { "text": "..." } ] } }
//! ```

use serde::{Deserialize, Serialize};

use super::provider::EmbeddingProvider;
use super::types::{gemini_models, Embedding, ProviderInfo};
use crate::config::{DEFAULT_EMBED_ENDPOINT, DEFAULT_EMBED_MODEL};
use crate::error::{Error, Result};

/// Gemini embedding provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
    max_chars: usize,
}

impl GeminiProvider {
    /// Create a provider for the default model and endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(DEFAULT_EMBED_ENDPOINT, DEFAULT_EMBED_MODEL, api_key)
    }

    /// Create a provider with custom endpoint and model.
    #[must_use]
    pub fn with_config(endpoint: &str, model: &str, api_key: impl Into<String>) -> Self {
        let model = model.trim_start_matches("models/").to_string();
        let config = gemini_models::get_config(&model);

        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            api_key: api_key.into(),
            dimensions: config.dimensions,
            max_chars: config.max_chars,
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:embedContent", self.endpoint, self.model)
    }

    fn request_body<'a>(&self, text: &'a str) -> EmbedContentRequest<'a> {
        EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: vec![Part { text }],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: Option<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

fn parse_response(body: &str) -> Result<Embedding> {
    let data: EmbedContentResponse = serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("Failed to parse Gemini response: {e}")))?;

    match data.embedding {
        Some(ContentEmbedding { values }) if !values.is_empty() => Ok(values),
        _ => Err(Error::Provider("No embedding values in Gemini response".into())),
    }
}

impl EmbeddingProvider for GeminiProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "gemini".to_string(),
            model: self.model.clone(),
            dimensions: self.dimensions,
            max_chars: self.max_chars,
        }
    }

    async fn is_available(&self) -> bool {
        // Pinging the API would spend quota; a key is the best local signal.
        !self.api_key.trim().is_empty()
    }

    async fn generate_embedding(&self, text: &str) -> Result<Embedding> {
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("Failed to read Gemini response: {e}")))?;

        if !status.is_success() {
            return Err(Error::Provider(format!("Gemini API error ({status}): {body}")));
        }

        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let provider = GeminiProvider::with_config("https://example.test/v1beta/", "models/embedding-001", "k");
        let body = serde_json::to_value(provider.request_body("hello")).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "model": "models/embedding-001",
                "content": { "parts": [ { "text": "hello" } ] }
            })
        );
        assert_eq!(provider.url(), "https://example.test/v1beta/models/embedding-001:embedContent");
    }

    #[test]
    fn test_info_uses_model_table() {
        let info = GeminiProvider::new("k").info();
        assert_eq!(info.name, "gemini");
        assert_eq!(info.model, "gemini-embedding-001");
        assert_eq!(info.dimensions, 3072);
        assert_eq!(info.max_chars, 3000);
    }

    #[test]
    fn test_parse_response_values() {
        let values = parse_response(r#"{"embedding":{"values":[0.5,-0.25]}}"#).unwrap();
        assert_eq!(values, vec![0.5, -0.25]);
    }

    #[test]
    fn test_parse_response_missing_or_empty_values() {
        assert!(matches!(parse_response("{}"), Err(Error::Provider(_))));
        assert!(matches!(
            parse_response(r#"{"embedding":{"values":[]}}"#),
            Err(Error::Provider(_))
        ));
        assert!(matches!(parse_response("not json"), Err(Error::Provider(_))));
    }

    #[tokio::test]
    async fn test_availability_requires_key() {
        assert!(GeminiProvider::new("key").is_available().await);
        assert!(!GeminiProvider::new(" ").is_available().await);
    }
}
