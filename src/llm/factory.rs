use super::compatible::OpenAiCompatibleProvider;
use super::reliable::ReliableProvider;
use super::traits::Provider;
use crate::config::{LlmConfig, ReliabilityConfig};

/// Maps well-known provider names to their OpenAI-compatible base URL.
pub fn provider_base_url(name: &str) -> Option<&'static str> {
    let url = match name {
        "groq" => "https://api.groq.com/openai/v1",
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        _ => return None,
    };
    Some(url)
}

/// Build the provider described by `llm`, wrapped in retry handling.
pub fn create_provider(
    llm: &LlmConfig,
    reliability: &ReliabilityConfig,
) -> anyhow::Result<Box<dyn Provider>> {
    let name = llm.provider.trim().to_ascii_lowercase();
    let base_url = match (&llm.base_url, provider_base_url(&name)) {
        (Some(explicit), _) => explicit.clone(),
        (None, Some(known)) => known.to_string(),
        (None, None) => anyhow::bail!(
            "Unknown provider `{}`; set llm.base_url to use a custom OpenAI-compatible endpoint",
            llm.provider
        ),
    };

    let inner = OpenAiCompatibleProvider::new(
        &name,
        &base_url,
        llm.api_key.as_deref(),
        llm.timeout_secs,
    );

    Ok(Box::new(ReliableProvider::new(
        Box::new(inner),
        reliability.provider_retries,
        reliability.provider_backoff_ms,
    )))
}
