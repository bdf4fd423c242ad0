//! Search command implementation.

use colored::Colorize;
use serde::Serialize;

use super::{runtime, truncate, GlobalPaths};
use crate::error::Result;
use crate::index::{BuildOptions, ScoredChunk};
use crate::retriever::{RetrievalOutcome, Retriever};

#[derive(Serialize)]
struct KeywordOutput<'a> {
    mode: &'static str,
    query: &'a str,
    results: Vec<ScoredChunk>,
}

/// Execute the search command.
///
/// # Errors
///
/// Returns an error if configuration, the knowledge base or the index file
/// cannot be loaded.
pub fn execute(paths: GlobalPaths<'_>, query: &str, top_k: Option<usize>, keywords: bool, json: bool) -> Result<()> {
    let config = paths.resolve_config()?;
    let store = paths.load_store()?;
    let top_k = top_k.unwrap_or(config.top_k);

    if keywords {
        let retriever = Retriever::new(store, None, BuildOptions::from_config(&config));
        let results = retriever.retrieve_by_keywords(query, top_k);

        if json {
            let output = KeywordOutput {
                mode: "keywords",
                query,
                results,
            };
            println!("{}", serde_json::to_string(&output)?);
        } else if results.is_empty() {
            println!("No keyword matches.");
        } else {
            print_scored(&results);
        }
        return Ok(());
    }

    let retriever = Retriever::from_config(&config, store)?;
    let outcome = runtime()?.block_on(retriever.retrieve(query, top_k));

    if json {
        println!("{}", serde_json::to_string(&outcome)?);
        return Ok(());
    }

    match &outcome {
        RetrievalOutcome::Ranked { results } => print_scored(results),
        RetrievalOutcome::Degraded { chunks, reason } => {
            println!("{} {}", "Degraded:".yellow().bold(), reason);
            println!("{}", "Showing the first chunks of the knowledge base.".dimmed());
            println!();
            for (i, chunk) in chunks.iter().enumerate() {
                println!("{:>2}. {} {}", i + 1, chunk.title.bold(), format!("[{}]", chunk.category.as_str()).dimmed());
                println!("    {}", truncate(&chunk.content, 100));
            }
        }
    }

    Ok(())
}

fn print_scored(results: &[ScoredChunk]) {
    for (i, hit) in results.iter().enumerate() {
        println!(
            "{:>2}. {} {} {}",
            i + 1,
            format!("{:.3}", hit.score).cyan(),
            hit.chunk.title.bold(),
            format!("[{}]", hit.chunk.category.as_str()).dimmed()
        );
        println!("    {}", truncate(&hit.chunk.content, 100));
    }
}
