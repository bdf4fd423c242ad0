//! Config command implementation.

use colored::Colorize;
use serde::Serialize;

use super::GlobalPaths;
use crate::cli::{ConfigCommands, ConfigSetArgs};
use crate::config::{
    reset_settings, resolve_config_path, save_settings, EmbeddingSettings, IndexSettings,
    RagdeskSettings, RetrievalSettings,
};
use crate::error::{Error, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowOutput {
    config_path: String,
    embeddings_enabled: bool,
    api_key: Option<String>,
    embed_model: String,
    embed_endpoint: String,
    embed_timeout_secs: u64,
    batch_size: usize,
    batch_delay_ms: u64,
    index_path: Option<String>,
    top_k: usize,
}

/// Show the first and last four characters only.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// Execute config commands.
///
/// # Errors
///
/// Returns `Config` if the settings file cannot be read or written.
pub fn execute(command: &ConfigCommands, paths: GlobalPaths<'_>, json: bool) -> Result<()> {
    let path = resolve_config_path(paths.config)?;

    match command {
        ConfigCommands::Show => {
            let config = paths.resolve_config()?;
            let output = ShowOutput {
                config_path: path.display().to_string(),
                embeddings_enabled: config.embeddings_enabled,
                api_key: config.api_key.as_deref().map(mask),
                embed_model: config.embed_model.clone(),
                embed_endpoint: config.embed_endpoint.clone(),
                embed_timeout_secs: config.embed_timeout.as_secs(),
                batch_size: config.batch_size,
                batch_delay_ms: u64::try_from(config.batch_delay.as_millis()).unwrap_or(u64::MAX),
                index_path: config.index_file().map(|p| p.display().to_string()),
                top_k: config.top_k,
            };

            if json {
                println!("{}", serde_json::to_string(&output)?);
                return Ok(());
            }

            println!("{}", "Configuration".cyan().bold());
            println!("  File:        {}", output.config_path.dimmed());
            println!("  Embeddings:  {}", if output.embeddings_enabled { "enabled" } else { "disabled" });
            println!("  API key:     {}", output.api_key.as_deref().unwrap_or("(not set)"));
            println!("  Model:       {}", output.embed_model);
            println!("  Endpoint:    {}", output.embed_endpoint);
            println!("  Timeout:     {}s", output.embed_timeout_secs);
            println!("  Batch size:  {}", output.batch_size);
            println!("  Batch delay: {}ms", output.batch_delay_ms);
            println!("  Index file:  {}", output.index_path.as_deref().unwrap_or("(none)"));
            println!("  Top-K:       {}", output.top_k);
            Ok(())
        }
        ConfigCommands::Set(args) => {
            let update = settings_from_args(args)?;
            let merged = save_settings(&path, &update)?;

            if json {
                println!("{}", serde_json::to_string(&merged)?);
            } else {
                println!("{} {}", "Saved".green().bold(), path.display());
            }
            Ok(())
        }
        ConfigCommands::Reset => {
            reset_settings(&path)?;
            if json {
                println!("{}", serde_json::json!({ "reset": true, "path": path.display().to_string() }));
            } else {
                println!("{} {}", "Reset".green().bold(), path.display());
            }
            Ok(())
        }
    }
}

fn settings_from_args(args: &ConfigSetArgs) -> Result<RagdeskSettings> {
    if args.batch_size == Some(0) {
        return Err(Error::InvalidArgument("--batch-size must be at least 1".into()));
    }
    if args.top_k == Some(0) {
        return Err(Error::InvalidArgument("--top-k must be at least 1".into()));
    }

    let enabled = match (args.enable, args.disable) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let embeddings = EmbeddingSettings {
        enabled,
        api_key: args.api_key.clone(),
        model: args.model.clone(),
        endpoint: args.endpoint.clone(),
        timeout_secs: args.timeout_secs,
    };
    let index = IndexSettings {
        path: args.index_path.clone(),
        batch_size: args.batch_size,
        batch_delay_ms: args.batch_delay_ms,
    };
    let retrieval = RetrievalSettings { top_k: args.top_k };

    let settings = RagdeskSettings {
        embeddings: (embeddings != EmbeddingSettings::default()).then_some(embeddings),
        index: (index != IndexSettings::default()).then_some(index),
        retrieval: (retrieval != RetrievalSettings::default()).then_some(retrieval),
    };

    if settings == RagdeskSettings::default() {
        return Err(Error::InvalidArgument("nothing to set; pass at least one option".into()));
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_middle() {
        assert_eq!(mask("AIzaSyExampleKey1234"), "AIza…1234");
        assert_eq!(mask("short"), "*****");
    }

    #[test]
    fn test_settings_from_args_only_sets_given_sections() {
        let args = ConfigSetArgs {
            top_k: Some(4),
            disable: true,
            ..ConfigSetArgs::default()
        };
        let settings = settings_from_args(&args).unwrap();

        assert_eq!(settings.retrieval.unwrap().top_k, Some(4));
        assert_eq!(settings.embeddings.unwrap().enabled, Some(false));
        assert!(settings.index.is_none());
    }

    #[test]
    fn test_settings_from_args_rejects_empty_and_zero() {
        assert!(matches!(
            settings_from_args(&ConfigSetArgs::default()),
            Err(Error::InvalidArgument(_))
        ));
        let args = ConfigSetArgs {
            batch_size: Some(0),
            ..ConfigSetArgs::default()
        };
        assert!(settings_from_args(&args).is_err());
    }
}
