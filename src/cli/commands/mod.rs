//! Command implementations.

pub mod category;
pub mod completions;
pub mod config;
pub mod context;
pub mod embeddings;
pub mod index;
pub mod kb;
pub mod search;
pub mod version;

use std::path::Path;
use std::sync::Arc;

use crate::config::{resolve, resolve_config_path, ResolvedConfig};
use crate::error::{Error, Result};
use crate::knowledge::KnowledgeStore;

/// Paths shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct GlobalPaths<'a> {
    pub config: Option<&'a Path>,
    pub kb: Option<&'a Path>,
}

impl GlobalPaths<'_> {
    /// Resolve configuration from the settings file and environment.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the settings file is unreadable.
    pub fn resolve_config(&self) -> Result<ResolvedConfig> {
        resolve(&resolve_config_path(self.config)?)
    }

    /// The knowledge store: `--kb` file if given, bundled dataset otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be read or fails validation.
    pub fn load_store(&self) -> Result<Arc<KnowledgeStore>> {
        let store = match self.kb {
            Some(path) => KnowledgeStore::from_path(path)?,
            None => KnowledgeStore::bundled()?,
        };
        Ok(Arc::new(store))
    }
}

/// Create the tokio runtime for a command's async work.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}

/// Shorten `text` to `max` characters for one-line display.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let cut: String = single_line.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
