use super::github::GitHubSearchTool;
use super::http::HttpFetcher;
use super::registry::ToolRegistry;
use super::weather::WeatherTool;
use crate::config::ToolsConfig;
use std::sync::Arc;

/// Create the default tool registry: `github_search` and `weather`, sharing
/// one HTTP fetcher with the configured timeout and retry bound.
pub fn default_registry(config: &ToolsConfig) -> ToolRegistry {
    let fetcher = Arc::new(HttpFetcher::new(
        config.request_timeout_secs,
        config.max_retries,
    ));

    ToolRegistry::new()
        .with(Box::new(GitHubSearchTool::new(
            Arc::clone(&fetcher),
            &config.github_api_url,
            config.github_token.as_deref(),
        )))
        .with(Box::new(WeatherTool::new(
            fetcher,
            &config.weather_api_url,
            config.weather_api_key.as_deref(),
        )))
}
