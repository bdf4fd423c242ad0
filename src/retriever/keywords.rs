//! Literal keyword-overlap ranking.

use crate::index::ScoredChunk;
use crate::knowledge::KnowledgeChunk;

/// Lowercase, turn everything except letters, digits and `%` into spaces,
/// collapse runs, and pad with one space on each side.
fn normalize(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '%' { c } else { ' ' })
        .collect();
    let words: Vec<&str> = spaced.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}

/// Rank chunks by how many of their keywords occur in `query`.
///
/// Keywords match on word boundaries ("leave" does not match "sleeve").
/// Chunks without a match are dropped; equal counts keep store order. The
/// score is the match count relative to the best chunk's, so the first
/// result scores 1.0.
#[must_use]
pub fn rank_by_keywords(chunks: &[KnowledgeChunk], query: &str, top_k: usize) -> Vec<ScoredChunk> {
    let query = normalize(query);
    if top_k == 0 || query.trim().is_empty() {
        return Vec::new();
    }

    let mut matched: Vec<(usize, usize)> = chunks
        .iter()
        .enumerate()
        .filter_map(|(i, chunk)| {
            let count = chunk
                .keywords
                .iter()
                .map(|k| normalize(k))
                .filter(|k| !k.trim().is_empty() && query.contains(k.as_str()))
                .count();
            (count > 0).then_some((i, count))
        })
        .collect();

    matched.sort_by(|a, b| b.1.cmp(&a.1));
    matched.truncate(top_k);

    let best = matched.first().map_or(1, |(_, count)| *count);
    matched
        .into_iter()
        .map(|(i, count)| {
            #[allow(clippy::cast_precision_loss)]
            let score = count as f32 / best as f32;
            ScoredChunk {
                chunk: chunks[i].clone(),
                score,
            }
        })
        .collect()
}
