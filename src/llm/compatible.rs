//! Generic OpenAI-compatible provider.
//! Groq, OpenAI, OpenRouter and Ollama all expose the same
//! `/chat/completions` format, so one implementation covers them.

use super::http_client::build_http_client;
use super::scrub::api_error;
use super::traits::Provider;
use crate::error::LlmError;
use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

pub struct OpenAiCompatibleProvider {
    pub(crate) name: String,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    /// Pre-computed chat completions URL (avoids `format!` per request).
    cached_chat_url: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url.clone()
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            name: name.to_string(),
            base_url,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
            cached_chat_url,
            client: build_http_client(timeout_secs),
        }
    }

    /// Local servers such as Ollama accept unauthenticated requests.
    fn requires_key(&self) -> bool {
        !self.name.eq_ignore_ascii_case("ollama")
    }

    async fn call_chat_completions(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let mut builder = self.client.post(&self.cached_chat_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("{} chat completions request failed", self.name))?;

        if !response.status().is_success() {
            return Err(api_error(&self.name, response).await);
        }

        response
            .json()
            .await
            .with_context(|| format!("{} chat completions JSON decode failed", self.name))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_chat_text(response: ChatResponse, provider_name: &str) -> anyhow::Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            LlmError::EmptyResponse {
                provider: provider_name.to_string(),
            }
            .into()
        })
}

impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            if self.api_key.is_none() && self.requires_key() {
                return Err(LlmError::MissingApiKey {
                    provider: self.name.clone(),
                }
                .into());
            }

            let mut messages = Vec::with_capacity(2);
            if let Some(sys) = system_prompt {
                messages.push(Message {
                    role: "system",
                    content: sys.to_string(),
                });
            }
            messages.push(Message {
                role: "user",
                content: message.to_string(),
            });

            let request = ChatRequest {
                model: model.to_string(),
                messages,
                temperature,
            };

            let response = self.call_chat_completions(&request).await?;
            extract_chat_text(response, &self.name)
        })
    }
}
