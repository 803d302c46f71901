use super::http::HttpFetcher;
use super::params::{string_param, u32_param};
use super::traits::{Tool, ToolOutput};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

const DEFAULT_PER_PAGE: u32 = 5;
const MAX_PER_PAGE: u32 = 100;
const DEFAULT_QUERY: &str = "python";

/// Repository search and single-repository lookup against the GitHub REST API.
pub struct GitHubSearchTool {
    fetcher: Arc<HttpFetcher>,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<RepoItem>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl RepoItem {
    fn summary(&self) -> Map<String, Value> {
        let value = json!({
            "name": self.full_name,
            "description": self.description.as_deref().unwrap_or("No description"),
            "stars": self.stargazers_count,
            "url": self.html_url,
            "language": self.language,
            "topics": self.topics,
        });
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

impl GitHubSearchTool {
    pub fn new(fetcher: Arc<HttpFetcher>, base_url: &str, token: Option<&str>) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string),
        }
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Accept", "application/vnd.github.v3+json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("token {token}")));
        }
        headers
    }

    async fn fetch_search(&self, query: &str, per_page: u32) -> anyhow::Result<ToolOutput> {
        let body = self
            .fetcher
            .get_json(
                &format!("{}/search/repositories", self.base_url),
                &[
                    ("q", query.to_string()),
                    ("per_page", per_page.to_string()),
                    ("sort", "stars".to_string()),
                    ("order", "desc".to_string()),
                ],
                &self.headers(),
            )
            .await?;
        let parsed: SearchResponse = serde_json::from_value(body)?;

        let repositories: Vec<Value> = parsed
            .items
            .iter()
            .take(per_page as usize)
            .map(|item| Value::Object(item.summary()))
            .collect();

        let mut out = Map::new();
        out.insert("query".into(), json!(query));
        out.insert("total_count".into(), json!(parsed.total_count));
        out.insert("repositories".into(), Value::Array(repositories));
        Ok(out)
    }

    /// Search repositories ordered by stars. Failures come back as
    /// `{query, error, total_count: 0, repositories: []}`.
    pub async fn search(&self, query: &str, per_page: u32) -> ToolOutput {
        tracing::info!(query, per_page, "Searching GitHub repositories");
        match self.fetch_search(query, per_page).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(query, error = %e, "GitHub search failed");
                let mut out = Map::new();
                out.insert("query".into(), json!(query));
                out.insert("error".into(), json!(format!("{e:#}")));
                out.insert("total_count".into(), json!(0));
                out.insert("repositories".into(), json!([]));
                out
            }
        }
    }

    async fn fetch_repository(&self, owner: &str, repo: &str) -> anyhow::Result<ToolOutput> {
        let body = self
            .fetcher
            .get_json(
                &format!("{}/repos/{owner}/{repo}", self.base_url),
                &[],
                &self.headers(),
            )
            .await?;
        let item: RepoItem = serde_json::from_value(body)?;

        let mut out = item.summary();
        out.insert("forks".into(), json!(item.forks_count));
        out.insert("issues".into(), json!(item.open_issues_count));
        out.insert("created_at".into(), json!(item.created_at));
        out.insert("updated_at".into(), json!(item.updated_at));
        Ok(out)
    }

    /// Details for one repository. Failures come back as `{error, owner, repo}`.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> ToolOutput {
        tracing::info!(owner, repo, "Fetching GitHub repository");
        match self.fetch_repository(owner, repo).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(owner, repo, error = %e, "GitHub repository lookup failed");
                let mut out = Map::new();
                out.insert("error".into(), json!(format!("{e:#}")));
                out.insert("owner".into(), json!(owner));
                out.insert("repo".into(), json!(repo));
                out
            }
        }
    }
}

impl Tool for GitHubSearchTool {
    fn name(&self) -> &str {
        "github_search"
    }

    fn description(&self) -> &str {
        "Search GitHub repositories by keyword, or fetch details for one repository"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search keywords, e.g. a language or topic"
                },
                "per_page": {
                    "type": "integer",
                    "description": "Number of repositories to return",
                    "default": DEFAULT_PER_PAGE
                },
                "owner": {
                    "type": "string",
                    "description": "Repository owner, used with `repo` for a single lookup"
                },
                "repo": {
                    "type": "string",
                    "description": "Repository name, used with `owner` for a single lookup"
                }
            }
        })
    }

    fn execute<'a>(
        &'a self,
        params: Map<String, Value>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolOutput>> + Send + 'a>> {
        Box::pin(async move {
            let per_page = u32_param(&params, "per_page")
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE);

            if let Some(query) = string_param(&params, "query") {
                return Ok(self.search(&query, per_page).await);
            }
            if let (Some(owner), Some(repo)) =
                (string_param(&params, "owner"), string_param(&params, "repo"))
            {
                return Ok(self.get_repository(&owner, &repo).await);
            }
            Ok(self.search(DEFAULT_QUERY, per_page).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(server: &MockServer, token: Option<&str>) -> GitHubSearchTool {
        GitHubSearchTool::new(Arc::new(HttpFetcher::new(5, 2)), &server.uri(), token)
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn search_normalizes_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(query_param("q", "rust"))
            .and(query_param("per_page", "2"))
            .and(query_param("sort", "stars"))
            .and(query_param("order", "desc"))
            .and(header("authorization", "token ghp-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 1234,
                "items": [
                    {
                        "full_name": "rust-lang/rust",
                        "description": "Empowering everyone",
                        "stargazers_count": 100_000,
                        "html_url": "https://github.com/rust-lang/rust",
                        "language": "Rust",
                        "topics": ["compiler"]
                    },
                    {
                        "full_name": "tokio-rs/tokio",
                        "description": null,
                        "stargazers_count": 28_000,
                        "html_url": "https://github.com/tokio-rs/tokio",
                        "language": null
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let out = tool(&server, Some("ghp-test"))
            .execute(params(json!({"query": "rust", "per_page": "2"})))
            .await
            .unwrap();
        assert_eq!(out["query"], "rust");
        assert_eq!(out["total_count"], 1234);
        let repos = out["repositories"].as_array().unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0]["name"], "rust-lang/rust");
        assert_eq!(repos[0]["stars"], 100_000);
        assert_eq!(repos[0]["topics"], json!(["compiler"]));
        assert_eq!(repos[1]["description"], "No description");
        assert_eq!(repos[1]["topics"], json!([]));
        assert!(repos[1]["language"].is_null());
    }

    #[tokio::test]
    async fn search_failure_returns_error_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        let out = tool(&server, None)
            .execute(params(json!({"query": "python", "per_page": 5})))
            .await
            .unwrap();
        assert_eq!(out["query"], "python");
        assert_eq!(out["total_count"], 0);
        assert_eq!(out["repositories"], json!([]));
        assert!(
            out["error"]
                .as_str()
                .unwrap()
                .contains("Request failed after 2 attempts")
        );
    }

    #[tokio::test]
    async fn owner_and_repo_fetch_single_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/tokio-rs/axum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "full_name": "tokio-rs/axum",
                "description": "Web framework",
                "stargazers_count": 20_000,
                "html_url": "https://github.com/tokio-rs/axum",
                "language": "Rust",
                "topics": ["http"],
                "forks_count": 1000,
                "open_issues_count": 50,
                "created_at": "2021-05-30T00:00:00Z",
                "updated_at": "2025-01-01T00:00:00Z"
            })))
            .mount(&server)
            .await;

        let out = tool(&server, None)
            .execute(params(json!({"owner": "tokio-rs", "repo": "axum"})))
            .await
            .unwrap();
        assert_eq!(out["name"], "tokio-rs/axum");
        assert_eq!(out["forks"], 1000);
        assert_eq!(out["issues"], 50);
        assert_eq!(out["created_at"], "2021-05-30T00:00:00Z");
    }

    #[tokio::test]
    async fn missing_repository_returns_error_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/nobody/nothing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .expect(1)
            .mount(&server)
            .await;

        let out = tool(&server, None)
            .execute(params(json!({"owner": "nobody", "repo": "nothing"})))
            .await
            .unwrap();
        assert_eq!(out["owner"], "nobody");
        assert_eq!(out["repo"], "nothing");
        assert!(out["error"].as_str().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn no_query_searches_default_topic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(query_param("q", "python"))
            .and(query_param("per_page", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 0,
                "items": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let out = tool(&server, None).execute(Map::new()).await.unwrap();
        assert_eq!(out["query"], "python");
    }
}
