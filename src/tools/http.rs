use crate::error::ToolError;
use crate::llm::build_http_client;
use crate::llm::scrub::sanitize_api_error;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// GET-and-decode helper shared by the API tools.
///
/// Each attempt is bounded by the client timeout. Failed attempts are retried
/// immediately, without backoff, up to `max_attempts` in total. Client errors
/// other than 408 and 429 are not retried.
pub struct HttpFetcher {
    client: Client,
    max_attempts: u32,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64, max_attempts: u32) -> Self {
        Self {
            client: build_http_client(timeout_secs),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, String)],
    ) -> Result<Value, ToolError> {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            let mut request = self.client.get(url).query(query);
            for (name, value) in headers {
                request = request.header(*name, value);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    match response.json::<Value>().await {
                        Ok(body) => return Ok(body),
                        Err(e) => {
                            last_error = format!("invalid JSON body: {}", e.without_url());
                        }
                    }
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    last_error = format!("HTTP {status}: {}", sanitize_api_error(&body));
                    if is_permanent(status) {
                        return Err(ToolError::RequestFailed {
                            attempts: attempt,
                            message: last_error,
                        });
                    }
                }
                Err(e) => {
                    last_error = sanitize_api_error(&e.without_url().to_string());
                }
            }

            if attempt < self.max_attempts {
                tracing::warn!(
                    url,
                    attempt,
                    max_attempts = self.max_attempts,
                    error = %last_error,
                    "Tool request failed, retrying"
                );
            }
        }

        Err(ToolError::RequestFailed {
            attempts: self.max_attempts,
            message: last_error,
        })
    }
}

fn is_permanent(status: StatusCode) -> bool {
    status.is_client_error()
        && status != StatusCode::TOO_MANY_REQUESTS
        && status != StatusCode::REQUEST_TIMEOUT
}
