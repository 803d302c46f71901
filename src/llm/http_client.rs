use reqwest::Client;
use std::time::Duration;

/// Shared reqwest client with a whole-request timeout. Both the LLM provider
/// and the API tools build their clients here.
pub fn build_http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10.min(timeout_secs)))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(concat!("opsassist/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}
