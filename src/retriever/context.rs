//! Prompt-ready rendering of retrieved chunks.

use crate::knowledge::KnowledgeChunk;

/// Returned instead of an empty context.
pub const NO_INFORMATION_FOUND: &str = "No information found in the knowledge base.";

/// Render chunks as numbered source blocks separated by a blank line.
///
/// ```text
/// [Source 1: Vacation]
/// Title: ...
/// Audience: Magistrate
/// Content:
/// ...
/// ---
/// ```
#[must_use]
pub fn format_context(chunks: &[&KnowledgeChunk]) -> String {
    if chunks.is_empty() {
        return NO_INFORMATION_FOUND.to_string();
    }

    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[Source {}: {}]\nTitle: {}\nAudience: {}\nContent:\n{}\n---",
                i + 1,
                chunk.module,
                chunk.title,
                chunk.audience,
                chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::store::tests::chunk;
    use crate::knowledge::Category;

    #[test]
    fn test_blocks_numbered_in_order() {
        let a = chunk("a", "Vacation sale", Category::Vacation);
        let b = chunk("b", "Remote work", Category::RemoteWork);

        let text = format_context(&[&a, &b]);
        assert_eq!(
            text,
            "[Source 1: Vacation]\nTitle: Vacation sale\nAudience: Employee\nContent:\nVacation sale details\n---\n\n\
             [Source 2: Remote Work]\nTitle: Remote work\nAudience: Employee\nContent:\nRemote work details\n---"
        );
    }

    #[test]
    fn test_no_chunks_yields_sentinel() {
        assert_eq!(format_context(&[]), NO_INFORMATION_FOUND);
    }
}
