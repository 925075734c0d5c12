//! The RAG query engine (C9, spec §4.9): embed -> retrieve -> build prompt
//! with history -> generate -> citations.

use kbrag_coordinator::load_for_query;
use kbrag_core::types::{QueryRequest, QueryResponse};
use kbrag_postgres::query::KnowledgeBaseRepository;
use kbrag_postgres::types::IndexStatus;
use tracing::{info, instrument};

use crate::error::{QueryError, QueryResult};
use crate::prompt::{build_messages, build_system_prompt};
use crate::resolve::{build_sources, resolve_hits};
use crate::QueryContext;
use crate::TRACING_TARGET;

const NO_DOCUMENTS_ANSWER: &str =
    "This knowledge base has no indexed documents yet, so I have no information to answer from.";
const NO_RELEVANT_CONTEXT_ANSWER: &str =
    "I could not find any relevant information in this knowledge base to answer that question.";

/// Answers `request` against its knowledge base, applying the per-request
/// deadline from `ctx.config` (spec §5).
pub async fn query(ctx: &QueryContext, request: &QueryRequest) -> QueryResult<QueryResponse> {
    match tokio::time::timeout(ctx.config.deadline, run_query(ctx, request)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(QueryError::Timeout),
    }
}

#[instrument(skip(ctx, request), target = TRACING_TARGET, fields(kb_id = %request.kb_id))]
async fn run_query(ctx: &QueryContext, request: &QueryRequest) -> QueryResult<QueryResponse> {
    validate_request(request)?;

    let mut conn = ctx.pg.get_connection().await?;

    // Step 1: authorize.
    let kb = KnowledgeBaseRepository::find_by_id(&mut conn, request.owner_id, request.kb_id)
        .await?
        .ok_or(QueryError::KbNotFound { kb_id: request.kb_id })?;

    // Step 2: nothing indexed yet.
    if kb.document_count == 0
        && matches!(kb.index_status, IndexStatus::Empty | IndexStatus::Processing)
    {
        return Ok(no_documents_response(request));
    }

    // Step 3: embed with the KB's own embedding model.
    let mut vectors = ctx.models.embed(&kb.embedding_model, vec![request.query.clone()]).await?;
    let query_vector = vectors
        .pop()
        .ok_or_else(|| QueryError::InvalidInput("embedding model returned no vector".into()))?;
    if let Some(dimension) = kb.dimension {
        let dimension = dimension.max(0) as u32;
        if query_vector.len() as u32 != dimension {
            return Err(QueryError::DimensionMismatch {
                expected: dimension,
                actual: query_vector.len() as u32,
            });
        }
    }

    // Step 4: load the index read-only and search.
    let (index, _descriptor) = load_for_query(&ctx.objects, request.kb_id).await?;
    let mut hits = index.search(&query_vector, request.k as usize)?;

    // Step 5: distance threshold.
    if let Some(threshold) = request.distance_threshold {
        hits.retain(|hit| hit.distance <= threshold);
    }
    if hits.is_empty() {
        return Ok(no_relevant_context_response(request));
    }

    // Step 6: fetch chunk text.
    let resolved = resolve_hits(&mut conn, &ctx.objects, request.kb_id, &hits).await?;
    if resolved.is_empty() {
        return Ok(no_relevant_context_response(request));
    }

    // Step 7: build the prompt.
    let system_prompt = build_system_prompt(&resolved);
    let history = request.trimmed_history();
    let messages = build_messages(history, &request.query);

    // Step 8: generate.
    let answer = ctx
        .models
        .generate(&request.model_id, &system_prompt, &messages, &request.params)
        .await?;

    // Step 9: sources.
    let sources = build_sources(&resolved);

    info!(target: TRACING_TARGET, retrieved_chunks = resolved.len(), "query answered");
    Ok(QueryResponse {
        answer,
        sources,
        retrieved_chunks: resolved.len() as u32,
        query: request.query.clone(),
        model_id: request.model_id.clone(),
    })
}

fn no_documents_response(request: &QueryRequest) -> QueryResponse {
    QueryResponse {
        answer: NO_DOCUMENTS_ANSWER.to_string(),
        sources: Vec::new(),
        retrieved_chunks: 0,
        query: request.query.clone(),
        model_id: request.model_id.clone(),
    }
}

fn no_relevant_context_response(request: &QueryRequest) -> QueryResponse {
    QueryResponse {
        answer: NO_RELEVANT_CONTEXT_ANSWER.to_string(),
        sources: Vec::new(),
        retrieved_chunks: 0,
        query: request.query.clone(),
        model_id: request.model_id.clone(),
    }
}

/// Validates the request shape at the boundary (spec §6: `k ∈ [1, 20]`,
/// `temperature ∈ [0,1]`, `maxTokens ∈ [1, 8192]`, `topP ∈ [0,1]`).
fn validate_request(request: &QueryRequest) -> QueryResult<()> {
    if !(1..=20).contains(&request.k) {
        return Err(QueryError::InvalidInput(format!(
            "k must be in [1, 20], got {}",
            request.k
        )));
    }
    let params = &request.params;
    if !(0.0..=1.0).contains(&params.temperature) {
        return Err(QueryError::InvalidInput(format!(
            "temperature must be in [0, 1], got {}",
            params.temperature
        )));
    }
    if !(1..=8192).contains(&params.max_tokens) {
        return Err(QueryError::InvalidInput(format!(
            "max_tokens must be in [1, 8192], got {}",
            params.max_tokens
        )));
    }
    if !(0.0..=1.0).contains(&params.top_p) {
        return Err(QueryError::InvalidInput(format!(
            "top_p must be in [0, 1], got {}",
            params.top_p
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use kbrag_core::types::{GenerationParams, HistoryTurn, Role};
    use uuid::Uuid;

    use super::*;

    fn base_request() -> QueryRequest {
        QueryRequest {
            kb_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            query: "what ppe is required?".into(),
            model_id: "gpt-5".into(),
            k: 3,
            history: Vec::new(),
            params: GenerationParams::default(),
            distance_threshold: None,
        }
    }

    #[test]
    fn rejects_k_out_of_range() {
        let mut req = base_request();
        req.k = 0;
        assert!(validate_request(&req).is_err());
        req.k = 21;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn rejects_out_of_range_generation_params() {
        let mut req = base_request();
        req.params.temperature = 1.5;
        assert!(validate_request(&req).is_err());

        let mut req = base_request();
        req.params.max_tokens = 0;
        assert!(validate_request(&req).is_err());

        let mut req = base_request();
        req.params.top_p = -0.1;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn accepts_a_well_formed_request() {
        assert!(validate_request(&base_request()).is_ok());
    }

    #[test]
    fn no_documents_response_has_zero_retrieved_chunks() {
        let req = base_request();
        let resp = no_documents_response(&req);
        assert_eq!(resp.retrieved_chunks, 0);
        assert!(resp.sources.is_empty());
    }

    #[test]
    fn canned_responses_echo_request_identity() {
        let req = base_request();
        let resp = no_relevant_context_response(&req);
        assert_eq!(resp.query, req.query);
        assert_eq!(resp.model_id, req.model_id);
    }

    #[test]
    fn history_is_untouched_by_trimming_helper_used_here() {
        let mut req = base_request();
        req.history = (0..2)
            .map(|i| HistoryTurn {
                role: Role::User,
                content: format!("turn {i}"),
            })
            .collect();
        assert_eq!(req.trimmed_history().len(), 2);
    }
}
