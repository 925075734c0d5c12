//! Prompt assembly (spec §4.9 step 7, §6 "System prompt contract").

use kbrag_core::types::{HistoryTurn, Role};

use crate::resolve::RetrievedChunk;

const SYSTEM_PREAMBLE: &str = "You are a knowledge base assistant. Answer the user's question \
using only the information in the context below. If the context does not contain the answer, \
say so plainly instead of guessing. Cite the source of any fact you use, using the filename and \
page number shown next to it in the context.";

/// Builds the system prompt: the fixed behavioural preamble plus a context
/// block listing `chunks` in the order given (ascending distance), each
/// tagged with its source.
pub fn build_system_prompt(chunks: &[RetrievedChunk]) -> String {
    if chunks.is_empty() {
        return format!(
            "{SYSTEM_PREAMBLE}\n\nContext: (no relevant context was found for this question)"
        );
    }

    let mut context = String::from("Context:\n");
    for chunk in chunks {
        let marker = match chunk.page_number {
            Some(page) => format!("[{} (Page {page})]", chunk.source_filename),
            None => format!("[{}]", chunk.source_filename),
        };
        context.push_str(&marker);
        context.push('\n');
        context.push_str(&chunk.text);
        context.push_str("\n\n");
    }

    format!("{SYSTEM_PREAMBLE}\n\n{}", context.trim_end())
}

/// Builds the ordered chat messages: the trimmed history followed by the
/// current query as the final user turn (spec §4.9 step 7).
pub fn build_messages(history: &[HistoryTurn], query: &str) -> Vec<(Role, String)> {
    let mut messages: Vec<(Role, String)> = history
        .iter()
        .map(|turn| (turn.role, turn.content.clone()))
        .collect();
    messages.push((Role::User, query.to_string()));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(filename: &str, page: Option<u32>, text: &str) -> RetrievedChunk {
        RetrievedChunk {
            text: text.into(),
            source_filename: filename.into(),
            page_number: page,
            distance: 0.0,
        }
    }

    #[test]
    fn system_prompt_names_no_context_when_empty() {
        let prompt = build_system_prompt(&[]);
        assert!(prompt.contains("no relevant context"));
    }

    #[test]
    fn system_prompt_lists_chunks_with_source_markers() {
        let chunks = vec![chunk("hse.pdf", Some(3), "wear a hard hat")];
        let prompt = build_system_prompt(&chunks);
        assert!(prompt.contains("[hse.pdf (Page 3)]"));
        assert!(prompt.contains("wear a hard hat"));
    }

    #[test]
    fn messages_append_query_as_final_user_turn() {
        let history = vec![HistoryTurn {
            role: Role::User,
            content: "hi".into(),
        }];
        let messages = build_messages(&history, "what ppe is required?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], (Role::User, "what ppe is required?".to_string()));
    }
}
