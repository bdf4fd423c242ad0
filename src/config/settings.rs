//! Settings file load/save.
//!
//! The file is optional; a missing file behaves like an empty one.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Embedding provider settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Vector index build settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    /// Precomputed index file loaded at startup instead of building.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_delay_ms: Option<u64>,
}

/// Retrieval defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagdeskSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<EmbeddingSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<RetrievalSettings>,
}

impl RagdeskSettings {
    /// Overlay `newer` on top of `self`; values set in `newer` win.
    #[must_use]
    pub fn merged_with(self, newer: &Self) -> Self {
        let embeddings = match (self.embeddings, newer.embeddings.as_ref()) {
            (Some(old), Some(new)) => Some(EmbeddingSettings {
                enabled: new.enabled.or(old.enabled),
                api_key: new.api_key.clone().or(old.api_key),
                model: new.model.clone().or(old.model),
                endpoint: new.endpoint.clone().or(old.endpoint),
                timeout_secs: new.timeout_secs.or(old.timeout_secs),
            }),
            (old, new) => new.cloned().or(old),
        };

        let index = match (self.index, newer.index.as_ref()) {
            (Some(old), Some(new)) => Some(IndexSettings {
                path: new.path.clone().or(old.path),
                batch_size: new.batch_size.or(old.batch_size),
                batch_delay_ms: new.batch_delay_ms.or(old.batch_delay_ms),
            }),
            (old, new) => new.cloned().or(old),
        };

        let retrieval = match (self.retrieval, newer.retrieval.as_ref()) {
            (Some(old), Some(new)) => Some(RetrievalSettings {
                top_k: new.top_k.or(old.top_k),
            }),
            (old, new) => new.cloned().or(old),
        };

        Self {
            embeddings,
            index,
            retrieval,
        }
    }
}

/// Load settings from `path`. A missing file yields defaults.
///
/// # Errors
///
/// Returns `Config` if the file exists but cannot be read or parsed.
pub fn load_settings(path: &Path) -> Result<RagdeskSettings> {
    if !path.exists() {
        return Ok(RagdeskSettings::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Merge `settings` into the file at `path` and write it back.
///
/// # Errors
///
/// Returns `Config` if the file cannot be read, serialized, or written.
pub fn save_settings(path: &Path, settings: &RagdeskSettings) -> Result<RagdeskSettings> {
    let merged = load_settings(path)?.merged_with(settings);
    write_settings(path, &merged)?;
    Ok(merged)
}

/// Remove every setting (writes an empty object).
///
/// # Errors
///
/// Returns `Config` if the file cannot be written.
pub fn reset_settings(path: &Path) -> Result<()> {
    write_settings(path, &RagdeskSettings::default())
}

fn write_settings(path: &Path, settings: &RagdeskSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(path, content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, RagdeskSettings::default());
    }

    #[test]
    fn test_save_merges_with_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        save_settings(
            &path,
            &RagdeskSettings {
                embeddings: Some(EmbeddingSettings {
                    api_key: Some("key-1".into()),
                    model: Some("embedding-001".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .unwrap();

        let merged = save_settings(
            &path,
            &RagdeskSettings {
                embeddings: Some(EmbeddingSettings {
                    model: Some("gemini-embedding-001".into()),
                    ..Default::default()
                }),
                retrieval: Some(RetrievalSettings { top_k: Some(4) }),
                ..Default::default()
            },
        )
        .unwrap();

        let embeddings = merged.embeddings.unwrap();
        assert_eq!(embeddings.api_key.as_deref(), Some("key-1"));
        assert_eq!(embeddings.model.as_deref(), Some("gemini-embedding-001"));
        assert_eq!(load_settings(&path).unwrap().retrieval.unwrap().top_k, Some(4));
    }

    #[test]
    fn test_reset_clears_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        save_settings(
            &path,
            &RagdeskSettings {
                retrieval: Some(RetrievalSettings { top_k: Some(9) }),
                ..Default::default()
            },
        )
        .unwrap();

        reset_settings(&path).unwrap();
        assert_eq!(load_settings(&path).unwrap(), RagdeskSettings::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_settings(&path), Err(Error::Config(_))));
    }
}
