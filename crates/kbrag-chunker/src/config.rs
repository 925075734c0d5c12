//! Chunk sizing configuration (spec §4.5).

/// Target chunk size and overlap, both in tokens of the shared tokenizer.
#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
    pub target_tokens: usize,
    pub overlap_tokens: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            target_tokens: 1000,
            overlap_tokens: 200,
        }
    }
}
