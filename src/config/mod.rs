//! Configuration management.
//!
//! Settings live in a JSON file at `~/.ragdesk/config.json`. Every value can
//! be overridden from the environment:
//!
//! Priority (per value): environment variable > settings file > default.
//!
//! | Value | Environment variable |
//! |---|---|
//! | API key | `GEMINI_API_KEY`, then `GOOGLE_API_KEY` |
//! | Embedding model | `RAGDESK_EMBED_MODEL` |
//! | Endpoint base URL | `RAGDESK_EMBED_ENDPOINT` |
//! | Per-call timeout (s) | `RAGDESK_EMBED_TIMEOUT_SECS` |
//! | Batch size | `RAGDESK_BATCH_SIZE` |
//! | Delay between batches (ms) | `RAGDESK_BATCH_DELAY_MS` |
//! | Precomputed index file | `RAGDESK_INDEX_PATH` |
//! | Default top-K | `RAGDESK_TOP_K` |
//! | Embeddings on/off | `RAGDESK_EMBEDDINGS_ENABLED` |

mod settings;

pub use settings::{
    load_settings, reset_settings, save_settings, EmbeddingSettings, IndexSettings,
    RagdeskSettings, RetrievalSettings,
};

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_EMBED_MODEL: &str = "gemini-embedding-001";
pub const DEFAULT_EMBED_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1000;
pub const DEFAULT_TOP_K: usize = 3;
pub const INDEX_FILE_NAME: &str = "index.json";

/// Get the global ragdesk directory (`~/.ragdesk/`).
#[must_use]
pub fn global_ragdesk_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ragdesk"))
}

/// Resolve the settings file path.
///
/// Priority:
/// 1. `explicit_path` (from `--config`)
/// 2. `RAGDESK_CONFIG` environment variable
/// 3. `~/.ragdesk/config.json`
///
/// # Errors
///
/// Returns `Config` if no home directory can be determined.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("RAGDESK_CONFIG") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    global_ragdesk_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub embeddings_enabled: bool,
    pub api_key: Option<String>,
    pub embed_model: String,
    pub embed_endpoint: String,
    pub embed_timeout: Duration,
    pub batch_size: usize,
    pub batch_delay: Duration,
    /// Index file set through config or environment.
    pub index_path: Option<PathBuf>,
    pub top_k: usize,
    /// `~/.ragdesk`, holding the default index file.
    pub ragdesk_dir: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Index file location: the configured path, else `~/.ragdesk/index.json`.
    #[must_use]
    pub fn index_file(&self) -> Option<PathBuf> {
        self.index_path
            .clone()
            .or_else(|| self.ragdesk_dir.as_ref().map(|dir| dir.join(INDEX_FILE_NAME)))
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with(&RagdeskSettings::default(), |_| None)
    }
}

/// Load settings from `config_path` and apply the process environment.
///
/// # Errors
///
/// Returns an error if the settings file exists but cannot be read or parsed.
pub fn resolve(config_path: &Path) -> Result<ResolvedConfig> {
    let settings = load_settings(config_path)?;
    Ok(resolve_with(&settings, |name| std::env::var(name).ok()))
}

/// Resolve configuration from settings and an environment lookup.
///
/// Empty environment values are treated as unset. Numeric values that fail
/// to parse are skipped with a warning so the next source applies.
pub fn resolve_with<F>(settings: &RagdeskSettings, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());
    let embeddings = settings.embeddings.clone().unwrap_or_default();
    let index = settings.index.clone().unwrap_or_default();
    let retrieval = settings.retrieval.clone().unwrap_or_default();

    let embeddings_enabled = env("RAGDESK_EMBEDDINGS_ENABLED")
        .map(|v| v != "false" && v != "0")
        .or(embeddings.enabled)
        .unwrap_or(true);

    let api_key = env("GEMINI_API_KEY")
        .or_else(|| env("GOOGLE_API_KEY"))
        .or(embeddings.api_key)
        .filter(|k| !k.trim().is_empty());

    let embed_model = env("RAGDESK_EMBED_MODEL")
        .or(embeddings.model)
        .unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string());

    let embed_endpoint = env("RAGDESK_EMBED_ENDPOINT")
        .or(embeddings.endpoint)
        .unwrap_or_else(|| DEFAULT_EMBED_ENDPOINT.to_string());

    let timeout_secs = parse_env::<u64>(&env, "RAGDESK_EMBED_TIMEOUT_SECS")
        .or(embeddings.timeout_secs)
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let batch_size = parse_env::<usize>(&env, "RAGDESK_BATCH_SIZE")
        .or(index.batch_size)
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_BATCH_SIZE);

    let batch_delay_ms = parse_env::<u64>(&env, "RAGDESK_BATCH_DELAY_MS")
        .or(index.batch_delay_ms)
        .unwrap_or(DEFAULT_BATCH_DELAY_MS);

    let index_path = env("RAGDESK_INDEX_PATH").map(PathBuf::from).or(index.path);

    let top_k = parse_env::<usize>(&env, "RAGDESK_TOP_K")
        .or(retrieval.top_k)
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_TOP_K);

    ResolvedConfig {
        embeddings_enabled,
        api_key,
        embed_model,
        embed_endpoint,
        embed_timeout: Duration::from_secs(timeout_secs),
        batch_size,
        batch_delay: Duration::from_millis(batch_delay_ms),
        index_path,
        top_k,
        ragdesk_dir: global_ragdesk_dir(),
    }
}

/// Index file for a command: `explicit`, then [`ResolvedConfig::index_file`].
///
/// # Errors
///
/// Returns `Config` if nothing is configured and no home directory can be
/// determined.
pub fn index_file_path(explicit: Option<&Path>, config: &ResolvedConfig) -> Result<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.index_file())
        .ok_or(Error::Config("Could not determine home directory".into()))
}

fn parse_env<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = env(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring unparseable environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ResolvedConfig::default();
        assert!(config.embeddings_enabled);
        assert_eq!(config.api_key, None);
        assert_eq!(config.embed_model, DEFAULT_EMBED_MODEL);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.batch_delay, Duration::from_millis(1000));
        assert_eq!(config.top_k, 3);
        assert_eq!(config.index_path, None);
    }

    #[test]
    fn test_env_overrides_settings() {
        let settings = RagdeskSettings {
            embeddings: Some(EmbeddingSettings {
                api_key: Some("from-file".into()),
                model: Some("embedding-001".into()),
                ..Default::default()
            }),
            index: Some(IndexSettings {
                batch_size: Some(8),
                ..Default::default()
            }),
            retrieval: None,
        };

        let config = resolve_with(
            &settings,
            env_of(&[("GEMINI_API_KEY", "from-env"), ("RAGDESK_BATCH_SIZE", "2")]),
        );
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.embed_model, "embedding-001");
        assert_eq!(config.batch_size, 2);
    }

    #[test]
    fn test_unparseable_env_falls_back_to_settings() {
        let settings = RagdeskSettings {
            retrieval: Some(RetrievalSettings { top_k: Some(7) }),
            ..Default::default()
        };
        let config = resolve_with(&settings, env_of(&[("RAGDESK_TOP_K", "lots")]));
        assert_eq!(config.top_k, 7);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = resolve_with(&RagdeskSettings::default(), env_of(&[("RAGDESK_BATCH_SIZE", "0")]));
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_embeddings_disabled_by_env() {
        let config = resolve_with(
            &RagdeskSettings::default(),
            env_of(&[("RAGDESK_EMBEDDINGS_ENABLED", "false")]),
        );
        assert!(!config.embeddings_enabled);
    }

    #[test]
    fn test_google_api_key_fallback_and_blank_keys() {
        let config = resolve_with(&RagdeskSettings::default(), env_of(&[("GOOGLE_API_KEY", "g")]));
        assert_eq!(config.api_key.as_deref(), Some("g"));

        let config = resolve_with(&RagdeskSettings::default(), env_of(&[("GEMINI_API_KEY", "  ")]));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = resolve_with(
            &RagdeskSettings::default(),
            env_of(&[("RAGDESK_EMBED_TIMEOUT_SECS", "0")]),
        );
        assert_eq!(config.embed_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_index_file_defaults_to_ragdesk_dir() {
        let mut config = ResolvedConfig {
            ragdesk_dir: Some(PathBuf::from("/home/u/.ragdesk")),
            ..ResolvedConfig::default()
        };
        assert_eq!(config.index_file(), Some(PathBuf::from("/home/u/.ragdesk/index.json")));
        assert_eq!(
            index_file_path(None, &config).unwrap(),
            PathBuf::from("/home/u/.ragdesk/index.json")
        );

        config.index_path = Some(PathBuf::from("/srv/index.json"));
        assert_eq!(config.index_file(), Some(PathBuf::from("/srv/index.json")));
        assert_eq!(
            index_file_path(Some(Path::new("/tmp/out.json")), &config).unwrap(),
            PathBuf::from("/tmp/out.json")
        );
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/custom.json"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.json"));
    }
}
