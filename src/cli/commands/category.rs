//! Category command implementation.

use colored::Colorize;
use serde::Serialize;

use super::{truncate, GlobalPaths};
use crate::error::Result;
use crate::index::BuildOptions;
use crate::knowledge::{Category, KnowledgeChunk};
use crate::retriever::Retriever;

#[derive(Serialize)]
struct CategoryOutput {
    category: Category,
    label: &'static str,
    chunks: Vec<KnowledgeChunk>,
}

/// Execute the category command.
///
/// # Errors
///
/// Returns `UnknownCategory` if `name` is not a known category.
pub fn execute(paths: GlobalPaths<'_>, name: &str, top_k: Option<usize>, json: bool) -> Result<()> {
    let category: Category = name.parse()?;
    let config = paths.resolve_config()?;
    let top_k = top_k.unwrap_or(config.top_k);

    // Structural lookup; no provider needed.
    let retriever = Retriever::new(paths.load_store()?, None, BuildOptions::from_config(&config));
    let chunks = retriever.retrieve_by_category(category, top_k);

    if json {
        let output = CategoryOutput {
            category,
            label: category.label(),
            chunks,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", category.label().cyan().bold());
    if chunks.is_empty() {
        println!("  {}", "(no chunks)".dimmed());
    }
    for chunk in &chunks {
        println!("  {} {}", chunk.title.bold(), format!("({})", chunk.audience).dimmed());
        println!("    {}", truncate(&chunk.content, 100));
    }
    Ok(())
}
