use super::factory::create_provider;
use super::json::extract_json_object;
use super::traits::Provider;
use crate::config::Config;
use crate::utils::text::truncate_with_ellipsis;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Model-bound handle used by the planner and verifier.
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn Provider>,
    model: String,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = create_provider(&config.llm, &config.reliability)?;
        Ok(Self::new(Arc::from(provider), config.llm.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(
        &self,
        system_prompt: &str,
        prompt: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        tracing::debug!(
            provider = self.provider.name(),
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending LLM request"
        );
        self.provider
            .chat_with_system(Some(system_prompt), prompt, &self.model, temperature)
            .await
    }

    /// Ask the model for a JSON object and parse it out of the reply.
    pub async fn generate_json(
        &self,
        system_prompt: &str,
        prompt: &str,
        temperature: f64,
    ) -> anyhow::Result<Map<String, Value>> {
        let raw = self.generate(system_prompt, prompt, temperature).await?;
        extract_json_object(&raw).map_err(|e| {
            tracing::warn!(
                error = %e,
                response = %truncate_with_ellipsis(&raw, 200),
                "LLM response did not contain usable JSON"
            );
            e.into()
        })
    }
}
