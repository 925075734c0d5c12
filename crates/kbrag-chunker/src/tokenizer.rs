//! The deterministic tokenizer shared between the chunker and the query
//! engine's prompt builder (spec §4.5: "Count tokens using a deterministic
//! tokenizer shared between chunker and generation prompt-builder").

use std::sync::OnceLock;

use tiktoken_rs::CoreBPE;

static BPE: OnceLock<CoreBPE> = OnceLock::new();

pub(crate) fn bpe() -> &'static CoreBPE {
    BPE.get_or_init(|| tiktoken_rs::cl100k_base().expect("cl100k_base vocabulary is bundled"))
}

/// Counts tokens in `text` using the same cl100k_base vocabulary the
/// chunker's splitter targets, so the prompt builder's token budget lines
/// up with chunk sizes exactly.
pub fn count_tokens(text: &str) -> u32 {
    bpe().encode_ordinary(text).len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_nonzero_for_nonempty_text() {
        assert!(count_tokens("hello, world!") > 0);
    }

    #[test]
    fn empty_text_has_zero_tokens() {
        assert_eq!(count_tokens(""), 0);
    }

    #[test]
    fn longer_text_has_more_tokens() {
        assert!(count_tokens("one two three four five") > count_tokens("one two"));
    }
}
