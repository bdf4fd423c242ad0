//! Embedding types and model tables.

/// A dense embedding vector.
pub type Embedding = Vec<f32>;

/// Provider metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub dimensions: usize,
    pub max_chars: usize,
}

/// Model configuration with dimensions and max chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub name: String,
    pub dimensions: usize,
    pub max_chars: usize,
}

/// Gemini embedding model configurations.
pub mod gemini_models {
    use super::ModelConfig;

    pub fn gemini_embedding_001() -> ModelConfig {
        ModelConfig {
            name: "gemini-embedding-001".to_string(),
            dimensions: 3072,
            max_chars: 3000,
        }
    }

    pub fn embedding_001() -> ModelConfig {
        ModelConfig {
            name: "embedding-001".to_string(),
            dimensions: 768,
            max_chars: 2000,
        }
    }

    pub fn text_embedding_004() -> ModelConfig {
        ModelConfig {
            name: "text-embedding-004".to_string(),
            dimensions: 768,
            max_chars: 2000,
        }
    }

    /// Accepts ids with or without the `models/` prefix.
    pub fn get_config(model: &str) -> ModelConfig {
        match model.trim_start_matches("models/") {
            "gemini-embedding-001" => gemini_embedding_001(),
            "embedding-001" => embedding_001(),
            "text-embedding-004" => text_embedding_004(),
            other => ModelConfig {
                name: other.to_string(),
                dimensions: 768, // Default assumption
                max_chars: 2000,
            },
        }
    }
}
