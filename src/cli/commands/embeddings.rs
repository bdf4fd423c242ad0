//! Embeddings command implementation.
//!
//! - `status` - Show provider configuration
//! - `test` - Test provider connectivity

use serde::Serialize;

use super::{runtime, GlobalPaths};
use crate::cli::EmbeddingsCommands;
use crate::embeddings::{create_embedding_provider, gemini_models, require_embedding_client};
use crate::error::Result;

/// Output for embeddings status command.
#[derive(Serialize)]
struct StatusOutput {
    enabled: bool,
    api_key_configured: bool,
    provider: Option<String>,
    available: bool,
    model: String,
    endpoint: String,
    dimensions: usize,
    max_chars: usize,
    timeout_secs: u64,
}

/// Output for embeddings test command.
#[derive(Serialize)]
struct TestOutput {
    success: bool,
    provider: String,
    model: String,
    dimensions: usize,
    input_text: String,
    embedding_sample: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute embeddings command.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the test call fails.
pub fn execute(command: &EmbeddingsCommands, paths: GlobalPaths<'_>, json: bool) -> Result<()> {
    match command {
        EmbeddingsCommands::Status => execute_status(paths, json),
        EmbeddingsCommands::Test { text } => execute_test(paths, text, json),
    }
}

fn execute_status(paths: GlobalPaths<'_>, json: bool) -> Result<()> {
    let config = paths.resolve_config()?;
    let model = gemini_models::get_config(&config.embed_model);
    let provider = create_embedding_provider(&config);
    let available = match &provider {
        Some(p) => runtime()?.block_on(p.is_available()),
        None => false,
    };

    let output = StatusOutput {
        enabled: config.embeddings_enabled,
        api_key_configured: config.api_key.is_some(),
        provider: provider.map(|p| p.info().name),
        available,
        model: model.name,
        endpoint: config.embed_endpoint,
        dimensions: model.dimensions,
        max_chars: model.max_chars,
        timeout_secs: config.embed_timeout.as_secs(),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Embeddings: {}", if output.enabled { "enabled" } else { "disabled" });
    println!("Provider:   {}", output.provider.as_deref().unwrap_or("none (set GEMINI_API_KEY)"));
    println!("Available:  {}", if output.available { "yes" } else { "no" });
    println!("Model:      {}", output.model);
    println!("Endpoint:   {}", output.endpoint);
    println!("Dimensions: {}", output.dimensions);
    println!("Max chars:  {}", output.max_chars);
    println!("Timeout:    {}s", output.timeout_secs);
    Ok(())
}

fn execute_test(paths: GlobalPaths<'_>, text: &str, json: bool) -> Result<()> {
    let config = paths.resolve_config()?;
    let client = require_embedding_client(&config)?;
    let info = client.info();

    let result = runtime()?.block_on(client.embed(text));

    match result {
        Ok(embedding) => {
            let sample: Vec<f32> = embedding.iter().take(5).copied().collect();

            if json {
                let output = TestOutput {
                    success: true,
                    provider: info.name,
                    model: info.model,
                    dimensions: embedding.len(),
                    input_text: text.to_string(),
                    embedding_sample: sample,
                    error: None,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("Embedding Test: SUCCESS");
                println!();
                println!("Provider:   {}", info.name);
                println!("Model:      {}", info.model);
                println!("Dimensions: {}", embedding.len());
                println!("Input:      \"{text}\"");
                println!();
                println!("Sample (first 5 values):");
                for (i, v) in sample.iter().enumerate() {
                    println!("  [{i}] {v:.6}");
                }
            }
            Ok(())
        }
        Err(e) => {
            if json {
                let output = TestOutput {
                    success: false,
                    provider: info.name,
                    model: info.model,
                    dimensions: 0,
                    input_text: text.to_string(),
                    embedding_sample: vec![],
                    error: Some(e.to_string()),
                };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("Embedding Test: FAILED");
                println!();
                println!("Provider: {}", info.name);
                println!("Model:    {}", info.model);
                println!("Error:    {e}");
            }
            Err(e)
        }
    }
}
