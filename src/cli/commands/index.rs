//! Index command implementation.
//!
//! - `build` - embed the knowledge base (batched, rate-limited) and write the index file
//! - `status` - describe an existing index file

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use super::{runtime, GlobalPaths};
use crate::cli::IndexCommands;
use crate::config::index_file_path;
use crate::embeddings::require_embedding_client;
use crate::error::{Error, Result};
use crate::index::{read_index_file, write_index_file, BuildOptions, IndexFile, VectorIndex};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildOutput {
    path: String,
    document_count: usize,
    indexed_count: usize,
    skipped_count: usize,
    embedding_dimension: usize,
    model: String,
    elapsed_ms: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    path: String,
    version: String,
    generated_at: DateTime<Utc>,
    document_count: usize,
    embedding_dimension: usize,
    /// Entries that still match the current knowledge base.
    usable_count: usize,
    knowledge_base_count: usize,
}

/// Execute index commands.
///
/// # Errors
///
/// Returns an error if no provider is configured (build), or the index file
/// cannot be written or read.
pub fn execute(command: &IndexCommands, paths: GlobalPaths<'_>, json: bool) -> Result<()> {
    match command {
        IndexCommands::Build { output } => build(paths, output.as_deref(), json),
        IndexCommands::Status { index } => status(paths, index.as_deref(), json),
    }
}

fn build(paths: GlobalPaths<'_>, output: Option<&Path>, json: bool) -> Result<()> {
    let config = paths.resolve_config()?;
    let path = index_file_path(output, &config)?;
    let client = Arc::new(require_embedding_client(&config)?);
    let model = client.info().model;
    let store = paths.load_store()?;
    let document_count = store.len();

    let index = VectorIndex::new(client, store, BuildOptions::from_config(&config));
    let started = Instant::now();
    let snapshot = runtime()?.block_on(index.build());
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    // An index with no entries would only ever degrade; keep any previous file.
    if snapshot.is_empty() && document_count > 0 {
        return Err(Error::IndexEmpty);
    }

    write_index_file(&path, &IndexFile::from_snapshot(&snapshot))?;

    let result = BuildOutput {
        path: path.display().to_string(),
        document_count,
        indexed_count: snapshot.len(),
        skipped_count: document_count - snapshot.len(),
        embedding_dimension: snapshot.embedding_dimension,
        model,
        elapsed_ms,
    };

    if json {
        println!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }

    println!("{} {}", "Index written:".green().bold(), result.path);
    println!("  Model:      {}", result.model);
    println!("  Indexed:    {}/{}", result.indexed_count, result.document_count);
    println!("  Dimensions: {}", result.embedding_dimension);
    println!("  Elapsed:    {:.1}s", started.elapsed().as_secs_f64());
    if result.skipped_count > 0 {
        println!(
            "  {}",
            format!("{} chunk(s) skipped; run with -v for details", result.skipped_count).yellow()
        );
    }
    Ok(())
}

fn status(paths: GlobalPaths<'_>, index: Option<&Path>, json: bool) -> Result<()> {
    let config = paths.resolve_config()?;
    let path = index_file_path(index, &config)?;
    let store = paths.load_store()?;

    let file = read_index_file(&path)?;
    let version = file.version.clone();
    let generated_at = file.generated_at;
    let document_count = file.document_count;
    let embedding_dimension = file.embedding_dimension;
    let usable = file.into_snapshot(&store, &path)?;

    let output = StatusOutput {
        path: path.display().to_string(),
        version,
        generated_at,
        document_count,
        embedding_dimension,
        usable_count: usable.len(),
        knowledge_base_count: store.len(),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Index File".cyan().bold());
    println!("  Path:       {}", output.path);
    println!("  Version:    {}", output.version);
    println!("  Generated:  {}", output.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Documents:  {}", output.document_count);
    println!("  Dimensions: {}", output.embedding_dimension);
    println!("  Usable:     {}/{} chunks of the current knowledge base", output.usable_count, output.knowledge_base_count);
    Ok(())
}
