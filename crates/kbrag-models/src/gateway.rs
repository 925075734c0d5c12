//! Uniform embedding/generation entry point (spec §4.3 "Model gateway").

use std::collections::HashMap;
use std::time::Duration;

use kbrag_core::retry::exponential_backoff;
use kbrag_core::types::{GenerationParams, Role};
use tracing::{debug, instrument, warn};

use crate::completion::CompletionProvider;
use crate::embedding::EmbeddingProvider;
use crate::error::{ModelError, ModelResult};
use crate::TRACING_TARGET;

/// Maximum texts sent to a provider in one embedding request; larger
/// batches are chunked internally (spec §4.3: "Input batch size may be
/// chunked internally to respect model limits").
const DEFAULT_MAX_BATCH: usize = 96;
const MAX_RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE: Duration = Duration::from_millis(250);
const RETRY_MAX: Duration = Duration::from_secs(10);

/// Registry of embedding/generation models addressable by `modelId`.
#[derive(Default)]
pub struct ModelGateway {
    embeddings: HashMap<String, EmbeddingProvider>,
    completions: HashMap<String, CompletionProvider>,
}

impl ModelGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_embedding_model(&mut self, provider: EmbeddingProvider) {
        self.embeddings.insert(provider.model_id().to_string(), provider);
    }

    pub fn register_completion_model(&mut self, provider: CompletionProvider) {
        self.completions
            .insert(provider.model_id().to_string(), provider);
    }

    pub fn embedding_dimension(&self, model_id: &str) -> ModelResult<usize> {
        self.embeddings
            .get(model_id)
            .map(EmbeddingProvider::dimension)
            .ok_or_else(|| ModelError::UnknownModel {
                model_id: model_id.to_string(),
            })
    }

    /// Embeds `texts`, chunking into batches the provider can accept and
    /// retrying transient/throttled failures with exponential backoff.
    /// Every returned vector shares the model's fixed dimension (spec
    /// §4.3).
    #[instrument(skip(self, texts), target = TRACING_TARGET, fields(model_id, text_count = texts.len()))]
    pub async fn embed(&self, model_id: &str, texts: Vec<String>) -> ModelResult<Vec<Vec<f32>>> {
        let provider = self
            .embeddings
            .get(model_id)
            .ok_or_else(|| ModelError::UnknownModel {
                model_id: model_id.to_string(),
            })?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(DEFAULT_MAX_BATCH) {
            let embedded = with_retry(|| provider.embed_texts(batch.to_vec())).await?;
            vectors.extend(embedded);
        }
        Ok(vectors)
    }

    /// Generates text from a system prompt, ordered messages, and sampling
    /// parameters, retrying transient/throttled failures (spec §4.3).
    #[instrument(skip(self, system_prompt, messages, params), target = TRACING_TARGET, fields(model_id))]
    pub async fn generate(
        &self,
        model_id: &str,
        system_prompt: &str,
        messages: &[(Role, String)],
        params: &GenerationParams,
    ) -> ModelResult<String> {
        let provider = self
            .completions
            .get(model_id)
            .ok_or_else(|| ModelError::UnknownModel {
                model_id: model_id.to_string(),
            })?;

        with_retry(|| provider.generate(system_prompt, messages, params)).await
    }
}

/// Retries `ModelError::Throttled`/`ModelError::Unavailable` up to
/// [`MAX_RETRY_ATTEMPTS`] times with exponential backoff; any other error
/// propagates immediately.
async fn with_retry<T, F, Fut>(mut op: F) -> ModelResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = ModelResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retryable(&err) && attempt < MAX_RETRY_ATTEMPTS => {
                attempt += 1;
                let delay = exponential_backoff(RETRY_BASE, attempt, RETRY_MAX);
                warn!(target: TRACING_TARGET, attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying model call");
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                debug!(target: TRACING_TARGET, error = %err, "model call failed permanently");
                return Err(err);
            }
        }
    }
}

fn is_retryable(err: &ModelError) -> bool {
    matches!(
        err,
        ModelError::Throttled { .. } | ModelError::Unavailable { .. }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn embed_on_unregistered_model_is_unknown_model() {
        let gateway = ModelGateway::new();
        let err = gateway.embed("nonexistent", vec!["hi".into()]).await.unwrap_err();
        assert!(matches!(err, ModelError::UnknownModel { .. }));
    }

    #[tokio::test]
    async fn embed_empty_input_short_circuits() {
        let gateway = ModelGateway::new();
        // No registered model needed: an unregistered model_id still
        // surfaces UnknownModel even for empty input, since the lookup
        // happens before the empty-texts check.
        let err = gateway.embed("m", vec![]).await.unwrap_err();
        assert!(matches!(err, ModelError::UnknownModel { .. }));
    }

    #[tokio::test]
    async fn with_retry_recovers_from_transient_throttling() {
        let attempts = AtomicU32::new(0);
        let result: ModelResult<&'static str> = with_retry(|| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ModelError::Throttled {
                        provider: "test".to_string(),
                    })
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn with_retry_gives_up_after_max_attempts() {
        let attempts = AtomicU32::new(0);
        let result: ModelResult<()> = with_retry(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(ModelError::Unavailable {
                provider: "test".to_string(),
                reason: "down".to_string(),
            }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), MAX_RETRY_ATTEMPTS + 1);
    }

    #[tokio::test]
    async fn with_retry_does_not_retry_invalid_input() {
        let attempts = AtomicU32::new(0);
        let result: ModelResult<()> = with_retry(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ModelError::InvalidInput {
                    provider: "test".to_string(),
                    reason: "bad".to_string(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
