use super::traits::Provider;
use crate::error::LlmError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Check if an error is non-retryable (client errors that won't resolve with retries).
fn is_non_retryable(err: &anyhow::Error) -> bool {
    if matches!(
        err.downcast_ref::<LlmError>(),
        Some(LlmError::MissingApiKey { .. })
    ) {
        return true;
    }

    let msg = err.to_string();
    if is_quota_exhausted(&msg) {
        return true;
    }

    if let Some(reqwest_err) = err.downcast_ref::<reqwest::Error>()
        && let Some(status) = reqwest_err.status()
    {
        let code = status.as_u16();
        // 429 and 408 are transient even though they are 4xx.
        return status.is_client_error() && code != 429 && code != 408;
    }
    // String fallback: scan for a 4xx status code in the error message
    for word in msg.split(|c: char| !c.is_ascii_digit()) {
        if let Ok(code) = word.parse::<u16>()
            && (400..500).contains(&code)
        {
            return code != 429 && code != 408;
        }
    }
    false
}

fn is_quota_exhausted(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("insufficient_quota") || lower.contains("exceeded your current quota")
}

/// Provider wrapper with retry + exponential backoff.
pub struct ReliableProvider {
    inner: Box<dyn Provider>,
    max_retries: u32,
    base_backoff_ms: u64,
}

impl ReliableProvider {
    pub fn new(inner: Box<dyn Provider>, max_retries: u32, base_backoff_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            base_backoff_ms,
        }
    }
}

impl Provider for ReliableProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let provider = self.inner.name();
            let mut backoff_ms = self.base_backoff_ms;
            let mut attempt = 0;

            loop {
                attempt += 1;
                let err = match self
                    .inner
                    .chat_with_system(system_prompt, message, model, temperature)
                    .await
                {
                    Ok(resp) => {
                        if attempt > 1 {
                            tracing::info!(provider, attempt, "Provider recovered after retries");
                        }
                        return Ok(resp);
                    }
                    Err(e) => e,
                };

                if is_non_retryable(&err) {
                    tracing::warn!(provider, attempt, "Non-retryable provider error");
                    return Err(with_attempts(err, provider, attempt));
                }
                if attempt > self.max_retries {
                    return Err(with_attempts(err, provider, attempt));
                }

                tracing::warn!(
                    provider,
                    attempt,
                    max_retries = self.max_retries,
                    error = %err,
                    "Provider call failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = backoff_ms.saturating_mul(2).min(10_000);
            }
        })
    }
}

/// A first-attempt failure is returned untouched. Later failures gain an
/// attempt count as context; the typed source stays downcastable.
fn with_attempts(err: anyhow::Error, provider: &str, attempts: u32) -> anyhow::Error {
    if attempts == 1 {
        err
    } else {
        err.context(format!("{provider} failed after {attempts} attempts"))
    }
}
