//! Embedding model wrapper, grounded on `nvisy-rig::provider::embedding`.

use std::sync::Arc;

#[cfg(feature = "ollama")]
use rig::client::Nothing;
use rig::embeddings::EmbeddingModel as RigEmbeddingModel;
use rig::prelude::EmbeddingsClient;
#[cfg(feature = "ollama")]
use rig::providers::ollama;
use rig::providers::openai;

use crate::classify::classify;
use crate::error::{ModelError, ModelResult};

/// Which provider backs an embedding model identifier, and the
/// credentials/dimension needed to construct it.
#[derive(Debug, Clone)]
pub enum EmbeddingModelSpec {
    OpenAi { api_key: String, dimensions: usize },
    #[cfg(feature = "ollama")]
    Ollama { base_url: String, dimensions: usize },
}

enum EmbeddingService {
    OpenAi {
        model: openai::EmbeddingModel,
    },
    #[cfg(feature = "ollama")]
    Ollama {
        client: ollama::Client,
        model_name: String,
        dimensions: usize,
    },
}

/// A single registered embedding model, addressable by `modelId` from the
/// gateway (spec §4.3: `embed(modelId, texts) -> [vector]`).
pub struct EmbeddingProvider {
    model_id: String,
    dimension: usize,
    inner: Arc<EmbeddingService>,
}

impl EmbeddingProvider {
    pub async fn create(model_id: impl Into<String>, spec: EmbeddingModelSpec) -> ModelResult<Self> {
        let model_id = model_id.into();
        let (inner, dimension) = match spec {
            EmbeddingModelSpec::OpenAi { api_key, dimensions } => {
                let client = openai::Client::new(&api_key).map_err(|e| ModelError::Fatal {
                    provider: "openai".to_string(),
                    reason: e.to_string(),
                })?;
                let model = client.embedding_model_with_ndims(&model_id, dimensions);
                (EmbeddingService::OpenAi { model }, dimensions)
            }
            #[cfg(feature = "ollama")]
            EmbeddingModelSpec::Ollama { base_url, dimensions } => {
                let client = ollama::Client::builder()
                    .api_key(Nothing)
                    .base_url(&base_url)
                    .build()
                    .map_err(|e| ModelError::Fatal {
                        provider: "ollama".to_string(),
                        reason: e.to_string(),
                    })?;
                (
                    EmbeddingService::Ollama {
                        client,
                        model_name: model_id.clone(),
                        dimensions,
                    },
                    dimensions,
                )
            }
        };
        Ok(Self {
            model_id,
            dimension,
            inner: Arc::new(inner),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Output dimension every vector from this model carries.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn provider_name(&self) -> &'static str {
        match self.inner.as_ref() {
            EmbeddingService::OpenAi { .. } => "openai",
            #[cfg(feature = "ollama")]
            EmbeddingService::Ollama { .. } => "ollama",
        }
    }

    /// Embeds a batch of texts, preserving input order.
    pub async fn embed_texts(&self, texts: Vec<String>) -> ModelResult<Vec<Vec<f32>>> {
        let result = match self.inner.as_ref() {
            EmbeddingService::OpenAi { model } => model.embed_texts(texts).await,
            #[cfg(feature = "ollama")]
            EmbeddingService::Ollama {
                client,
                model_name,
                dimensions,
            } => {
                let model = ollama::EmbeddingModel::new(client.clone(), model_name, *dimensions);
                model.embed_texts(texts).await
            }
        };

        let embeddings = result.map_err(|err| classify(self.provider_name(), err))?;
        Ok(embeddings
            .into_iter()
            .map(|embedding| embedding.vec.into_iter().map(|v| v as f32).collect())
            .collect())
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("model_id", &self.model_id)
            .field("provider", &self.provider_name())
            .field("dimension", &self.dimension)
            .finish()
    }
}
