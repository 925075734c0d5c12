//! Model provider arguments, mirroring `nvisy-cli::config::provider`'s
//! feature-gated provider selection, but resolved from CLI args/env rather
//! than compile-time features alone.

use clap::{Args, ValueEnum};
use kbrag_models::{CompletionModelSpec, CompletionProvider, EmbeddingModelSpec, EmbeddingProvider, ModelGateway, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelProviderKind {
    OpenAi,
    #[cfg(feature = "ollama")]
    Ollama,
}

#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct ModelArgs {
    /// Identifier the KB/request layer addresses the embedding model by.
    #[arg(long, env = "EMBEDDING_MODEL_ID", default_value = "text-embedding-3-small")]
    pub embedding_model_id: String,

    /// Which provider backs the embedding model.
    #[arg(long, env = "EMBEDDING_PROVIDER", value_enum, default_value_t = ModelProviderKind::OpenAi)]
    pub embedding_provider: ModelProviderKind,

    /// Embedding vector dimensionality.
    #[arg(long, env = "EMBEDDING_DIMENSIONS", default_value_t = 1536)]
    pub embedding_dimensions: usize,

    /// Identifier the request layer's `modelId` addresses the generation
    /// model by.
    #[arg(long, env = "GENERATION_MODEL_ID", default_value = "gpt-4o-mini")]
    pub generation_model_id: String,

    /// Which provider backs the generation model.
    #[arg(long, env = "GENERATION_PROVIDER", value_enum, default_value_t = ModelProviderKind::OpenAi)]
    pub generation_provider: ModelProviderKind,

    /// API key for OpenAI-backed models.
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Base URL for Ollama-backed models.
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = "http://127.0.0.1:11434")]
    pub ollama_base_url: String,
}

impl ModelArgs {
    /// Builds a gateway with this config's embedding and generation models
    /// registered under their configured `modelId`s.
    pub async fn build_gateway(&self) -> ModelResult<ModelGateway> {
        let mut gateway = ModelGateway::new();

        let embedding_spec = match self.embedding_provider {
            ModelProviderKind::OpenAi => EmbeddingModelSpec::OpenAi {
                api_key: self.openai_api_key.clone().unwrap_or_default(),
                dimensions: self.embedding_dimensions,
            },
            #[cfg(feature = "ollama")]
            ModelProviderKind::Ollama => EmbeddingModelSpec::Ollama {
                base_url: self.ollama_base_url.clone(),
                dimensions: self.embedding_dimensions,
            },
        };
        let embedding = EmbeddingProvider::create(&self.embedding_model_id, embedding_spec).await?;
        gateway.register_embedding_model(embedding);

        let completion_spec = match self.generation_provider {
            ModelProviderKind::OpenAi => CompletionModelSpec::OpenAi {
                api_key: self.openai_api_key.clone().unwrap_or_default(),
            },
            #[cfg(feature = "ollama")]
            ModelProviderKind::Ollama => CompletionModelSpec::Ollama {
                base_url: self.ollama_base_url.clone(),
            },
        };
        let completion = CompletionProvider::create(&self.generation_model_id, completion_spec).await?;
        gateway.register_completion_model(completion);

        Ok(gateway)
    }
}
