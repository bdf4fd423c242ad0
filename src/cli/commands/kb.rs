//! Knowledge base inspection commands.

use colored::Colorize;
use serde::Serialize;

use super::{truncate, GlobalPaths};
use crate::cli::KbCommands;
use crate::error::Result;
use crate::knowledge::{Category, KnowledgeChunk, KnowledgeStore};

#[derive(Serialize)]
struct ListOutput<'a> {
    count: usize,
    chunks: Vec<&'a KnowledgeChunk>,
}

#[derive(Serialize)]
struct KeywordsOutput {
    count: usize,
    keywords: Vec<String>,
}

/// Execute knowledge base commands.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or the category is unknown.
pub fn execute(command: &KbCommands, paths: GlobalPaths<'_>, json: bool) -> Result<()> {
    let store = paths.load_store()?;

    match command {
        KbCommands::List { category } => {
            let category = category.as_deref().map(str::parse::<Category>).transpose()?;
            list(&store, category, json)
        }
        KbCommands::Keywords => keywords(&store, json),
    }
}

fn list(store: &KnowledgeStore, category: Option<Category>, json: bool) -> Result<()> {
    let chunks: Vec<&KnowledgeChunk> = match category {
        Some(category) => store.by_category(category).collect(),
        None => store.all().iter().collect(),
    };

    if json {
        let output = ListOutput {
            count: chunks.len(),
            chunks,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{:<32} {:<20} {:<10} TITLE", "ID", "CATEGORY", "AUDIENCE");
    for chunk in &chunks {
        println!(
            "{:<32} {:<20} {:<10} {}",
            chunk.id,
            chunk.category.as_str(),
            chunk.audience.to_string(),
            truncate(&chunk.title, 60)
        );
    }
    println!();
    println!("{}", format!("{} chunk(s)", chunks.len()).dimmed());
    Ok(())
}

fn keywords(store: &KnowledgeStore, json: bool) -> Result<()> {
    let keywords: Vec<String> = store.all_keywords().into_iter().collect();

    if json {
        let output = KeywordsOutput {
            count: keywords.len(),
            keywords,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    for keyword in &keywords {
        println!("{keyword}");
    }
    Ok(())
}
