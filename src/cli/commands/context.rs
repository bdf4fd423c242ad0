//! Context command implementation.
//!
//! Prints exactly what the chat layer would splice into its prompt.

use serde::Serialize;

use super::{runtime, GlobalPaths};
use crate::error::Result;
use crate::retriever::Retriever;

#[derive(Serialize)]
struct ContextOutput<'a> {
    query: &'a str,
    context: String,
}

/// Execute the context command.
///
/// # Errors
///
/// Returns an error if configuration, the knowledge base or the index file
/// cannot be loaded.
pub fn execute(paths: GlobalPaths<'_>, query: &str, top_k: Option<usize>, json: bool) -> Result<()> {
    let config = paths.resolve_config()?;
    let retriever = Retriever::from_config(&config, paths.load_store()?)?;
    let top_k = top_k.unwrap_or(config.top_k);

    let context = runtime()?.block_on(retriever.get_retrieval_context(query, top_k));

    if json {
        let output = ContextOutput { query, context };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{context}");
    }
    Ok(())
}
