//! Text-generation model wrapper, grounded on
//! `nvisy-rig::provider::completion`.

use std::sync::Arc;

#[cfg(feature = "ollama")]
use rig::client::Nothing;
use rig::completion::CompletionModel as RigCompletionModel;
use rig::message::Message;
#[cfg(feature = "ollama")]
use rig::prelude::CompletionClient;
use rig::providers::openai;
#[cfg(feature = "ollama")]
use rig::providers::ollama;
use kbrag_core::types::{GenerationParams, Role};
use serde_json::json;

use crate::classify::classify;
use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone)]
pub enum CompletionModelSpec {
    OpenAi { api_key: String },
    #[cfg(feature = "ollama")]
    Ollama { base_url: String },
}

enum CompletionService {
    OpenAi { model: openai::CompletionModel },
    #[cfg(feature = "ollama")]
    Ollama { client: ollama::Client, model_name: String },
}

/// A single registered generation model, addressable by `modelId` from the
/// gateway (spec §4.3: `generate(modelId, systemPrompt, messages, params)`).
pub struct CompletionProvider {
    model_id: String,
    inner: Arc<CompletionService>,
}

impl CompletionProvider {
    pub async fn create(
        model_id: impl Into<String>,
        spec: CompletionModelSpec,
    ) -> ModelResult<Self> {
        let model_id = model_id.into();
        let inner = match spec {
            CompletionModelSpec::OpenAi { api_key } => {
                let client = openai::Client::new(&api_key).map_err(|e| ModelError::Fatal {
                    provider: "openai".to_string(),
                    reason: e.to_string(),
                })?;
                CompletionService::OpenAi {
                    model: client.completion_model(&model_id),
                }
            }
            #[cfg(feature = "ollama")]
            CompletionModelSpec::Ollama { base_url } => {
                let client = ollama::Client::builder()
                    .api_key(Nothing)
                    .base_url(&base_url)
                    .build()
                    .map_err(|e| ModelError::Fatal {
                        provider: "ollama".to_string(),
                        reason: e.to_string(),
                    })?;
                CompletionService::Ollama {
                    client,
                    model_name: model_id.clone(),
                }
            }
        };
        Ok(Self {
            model_id,
            inner: Arc::new(inner),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn provider_name(&self) -> &'static str {
        match self.inner.as_ref() {
            CompletionService::OpenAi { .. } => "openai",
            #[cfg(feature = "ollama")]
            CompletionService::Ollama { .. } => "ollama",
        }
    }

    /// Generates a response given a system prompt, ordered chat messages,
    /// and sampling parameters.
    pub async fn generate(
        &self,
        system_prompt: &str,
        messages: &[(Role, String)],
        params: &GenerationParams,
    ) -> ModelResult<String> {
        let (history, prompt) = split_history_and_prompt(messages);

        let send = async {
            match self.inner.as_ref() {
                CompletionService::OpenAi { model } => {
                    model
                        .completion_request(&prompt)
                        .preamble(system_prompt.to_string())
                        .messages(history)
                        .temperature(params.temperature as f64)
                        .max_tokens(params.max_tokens as u64)
                        .additional_params(json!({ "top_p": params.top_p }))
                        .send()
                        .await
                }
                #[cfg(feature = "ollama")]
                CompletionService::Ollama { client, model_name } => {
                    let model = client.completion_model(model_name);
                    model
                        .completion_request(&prompt)
                        .preamble(system_prompt.to_string())
                        .messages(history)
                        .temperature(params.temperature as f64)
                        .max_tokens(params.max_tokens as u64)
                        .additional_params(json!({ "top_p": params.top_p }))
                        .send()
                        .await
                }
            }
        };

        let response = send.await.map_err(|err| classify(self.provider_name(), err))?;
        Ok(extract_text(&response.choice))
    }
}

fn split_history_and_prompt(messages: &[(Role, String)]) -> (Vec<Message>, String) {
    let Some((last, rest)) = messages.split_last() else {
        return (Vec::new(), String::new());
    };

    let history = rest
        .iter()
        .map(|(role, content)| match role {
            Role::User => Message::user(content.clone()),
            Role::Assistant => Message::assistant(content.clone()),
        })
        .collect();

    (history, last.1.clone())
}

fn extract_text(choice: &rig::one_or_many::OneOrMany<rig::completion::AssistantContent>) -> String {
    choice
        .iter()
        .filter_map(|content| match content {
            rig::completion::AssistantContent::Text(text) => Some(text.text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionProvider")
            .field("model_id", &self.model_id)
            .field("provider", &self.provider_name())
            .finish()
    }
}
