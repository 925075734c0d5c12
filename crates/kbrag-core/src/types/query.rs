//! Query request/response shapes (spec §6 "Query request/response").

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single turn of conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Generation sampling parameters (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 1024,
            top_p: 1.0,
        }
    }
}

/// A query against a knowledge base's index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub kb_id: Uuid,
    pub owner_id: Uuid,
    pub query: String,
    /// Selects the generation model; embedding always uses the KB's own
    /// model regardless of this field (spec §4.9 step 3).
    pub model_id: String,
    /// `k` is bounded to `[1, 20]` by the caller; validated at the query
    /// engine boundary (spec §6).
    pub k: u32,
    pub history: Vec<HistoryTurn>,
    pub params: GenerationParams,
    pub distance_threshold: Option<f32>,
}

/// The grounded answer returned by the query engine (C9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<String>,
    pub retrieved_chunks: u32,
    pub query: String,
    pub model_id: String,
}

/// Maximum number of prior `(user, assistant)` turns folded into the prompt
/// (spec §4.9 step 7, "History").
pub const MAX_HISTORY_TURNS: usize = 5;

impl QueryRequest {
    /// Returns the trailing slice of history that belongs in the prompt.
    pub fn trimmed_history(&self) -> &[HistoryTurn] {
        let len = self.history.len();
        let start = len.saturating_sub(MAX_HISTORY_TURNS);
        &self.history[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(i: usize) -> HistoryTurn {
        HistoryTurn {
            role: Role::User,
            content: format!("turn {i}"),
        }
    }

    #[test]
    fn trims_history_to_last_five() {
        let req = QueryRequest {
            kb_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            query: "q".into(),
            model_id: "test-model".into(),
            k: 3,
            history: (0..6).map(turn).collect(),
            params: GenerationParams::default(),
            distance_threshold: None,
        };
        let trimmed = req.trimmed_history();
        assert_eq!(trimmed.len(), 5);
        assert_eq!(trimmed[0].content, "turn 1");
        assert_eq!(trimmed[4].content, "turn 5");
    }

    #[test]
    fn short_history_is_untouched() {
        let req = QueryRequest {
            kb_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            query: "q".into(),
            model_id: "test-model".into(),
            k: 3,
            history: (0..2).map(turn).collect(),
            params: GenerationParams::default(),
            distance_threshold: None,
        };
        assert_eq!(req.trimmed_history().len(), 2);
    }
}
