use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub reliability: ReliabilityConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub verifier: VerifierConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

// ── LLM ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "groq", "openai", "openrouter", "ollama" or "custom"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Overrides the provider's default OpenAI-compatible base URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub planner_temperature: f64,
    #[serde(default = "default_temperature")]
    pub verifier_temperature: f64,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "groq".into()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".into()
}

fn default_temperature() -> f64 {
    0.1
}

fn default_llm_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            model: default_model(),
            api_key: None,
            planner_temperature: default_temperature(),
            verifier_temperature: default_temperature(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

// ── Tools ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default = "default_weather_api_url")]
    pub weather_api_url: String,
    #[serde(default)]
    pub weather_api_key: Option<String>,
    /// Attempts per outbound tool request (immediate retry, no backoff)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_github_api_url() -> String {
    "https://api.github.com".into()
}

fn default_weather_api_url() -> String {
    "http://api.weatherapi.com/v1/current.json".into()
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            github_api_url: default_github_api_url(),
            github_token: None,
            weather_api_url: default_weather_api_url(),
            weather_api_key: None,
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// ── Reliability / supervision ────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    /// Retries per LLM provider call before giving up.
    #[serde(default = "default_provider_retries")]
    pub provider_retries: u32,
    /// Base backoff (ms) for provider retry delay.
    #[serde(default = "default_provider_backoff_ms")]
    pub provider_backoff_ms: u64,
}

fn default_provider_retries() -> u32 {
    2
}

fn default_provider_backoff_ms() -> u64 {
    500
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            provider_retries: default_provider_retries(),
            provider_backoff_ms: default_provider_backoff_ms(),
        }
    }
}

// ── Executor ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Maximum number of plan steps in flight at once. 1 runs steps sequentially.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

// ── Verifier ─────────────────────────────────────────────────────

/// What the verifier does when the formatting LLM call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmErrorPolicy {
    /// Build the formatted result locally from the raw step results.
    #[default]
    Fallback,
    /// Return the error to the caller.
    Propagate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifierConfig {
    #[serde(default)]
    pub on_llm_error: LlmErrorPolicy,
}

// ── Gateway ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Seconds a finished task stays retrievable via `GET /tasks/{id}`
    #[serde(default = "default_task_ttl_secs")]
    pub task_ttl_secs: u64,
    #[serde(default = "default_max_stored_tasks")]
    pub max_stored_tasks: usize,
    /// Plan length cap applied when a request omits `max_steps`
    #[serde(default = "default_max_steps")]
    pub default_max_steps: usize,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    8000
}

fn default_task_ttl_secs() -> u64 {
    3600
}

fn default_max_stored_tasks() -> usize {
    1000
}

fn default_max_steps() -> usize {
    10
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            task_ttl_secs: default_task_ttl_secs(),
            max_stored_tasks: default_max_stored_tasks(),
            default_max_steps: default_max_steps(),
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".opsassist").join("config.toml"),
            llm: LlmConfig::default(),
            tools: ToolsConfig::default(),
            reliability: ReliabilityConfig::default(),
            executor: ExecutorConfig::default(),
            verifier: VerifierConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

const KNOWN_PROVIDERS: &[&str] = &["groq", "openai", "openrouter", "ollama"];

impl Config {
    /// Resolve the effective configuration: the explicit file if given,
    /// otherwise `~/.opsassist/config.toml` (created on first run), followed
    /// by environment overrides and validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_or_init()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        config.warn_missing_credentials();
        Ok(config)
    }

    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let opsassist_dir = home.join(".opsassist");
        let config_path = opsassist_dir.join("config.toml");

        if !opsassist_dir.exists() {
            fs::create_dir_all(&opsassist_dir).context("Failed to create .opsassist directory")?;
        }

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            let config = Self {
                config_path,
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::Io)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(e.to_string()))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (label, temp) in [
            ("llm.planner_temperature", self.llm.planner_temperature),
            ("llm.verifier_temperature", self.llm.verifier_temperature),
        ] {
            if temp.is_nan() || !(0.0..=2.0).contains(&temp) {
                return Err(invalid(format!("{label} must be in [0.0, 2.0]")));
            }
        }
        if self.llm.timeout_secs == 0 {
            return Err(invalid("llm.timeout_secs must be >= 1"));
        }
        let provider = self.llm.provider.to_ascii_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) && self.llm.base_url.is_none() {
            return Err(invalid(format!(
                "llm.provider `{}` is not built in; set llm.base_url for a custom endpoint",
                self.llm.provider
            )));
        }
        if let Some(base_url) = &self.llm.base_url {
            check_url("llm.base_url", base_url)?;
        }
        check_url("tools.github_api_url", &self.tools.github_api_url)?;
        check_url("tools.weather_api_url", &self.tools.weather_api_url)?;
        if self.tools.max_retries == 0 {
            return Err(invalid("tools.max_retries must be >= 1"));
        }
        if self.tools.request_timeout_secs == 0 {
            return Err(invalid("tools.request_timeout_secs must be >= 1"));
        }
        if self.executor.max_concurrency == 0 {
            return Err(invalid("executor.max_concurrency must be >= 1"));
        }
        if self.gateway.max_stored_tasks == 0 {
            return Err(invalid("gateway.max_stored_tasks must be >= 1"));
        }
        if self.gateway.task_ttl_secs == 0 {
            return Err(invalid("gateway.task_ttl_secs must be >= 1"));
        }
        Ok(())
    }

    /// Missing keys are not fatal: without an LLM key the planner falls back
    /// to pattern matching, and tools report their failures per step.
    pub fn warn_missing_credentials(&self) {
        if self.llm.api_key.is_none() && self.llm.provider != "ollama" {
            tracing::warn!(
                provider = %self.llm.provider,
                "No LLM API key configured (GROQ_API_KEY); planning will use pattern fallback"
            );
        }
        if self.tools.github_token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set; GitHub requests are unauthenticated");
        }
        if self.tools.weather_api_key.is_none() {
            tracing::warn!("WEATHER_API_KEY not set; weather lookups will fail");
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides using `lookup` to resolve variable names. Empty values
    /// are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
        };

        if let Some(key) = get(&["GROQ_API_KEY", "OPSASSIST_API_KEY"]) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get(&["GROQ_MODEL", "OPSASSIST_MODEL"]) {
            self.llm.model = model;
        }
        if let Some(provider) = get(&["OPSASSIST_PROVIDER"]) {
            self.llm.provider = provider;
        }
        if let Some(base_url) = get(&["OPSASSIST_LLM_BASE_URL"]) {
            self.llm.base_url = Some(base_url);
        }

        if let Some(url) = get(&["GITHUB_API_URL"]) {
            self.tools.github_api_url = url;
        }
        if let Some(token) = get(&["GITHUB_TOKEN"]) {
            self.tools.github_token = Some(token);
        }
        if let Some(url) = get(&["WEATHER_API_URL"]) {
            self.tools.weather_api_url = url;
        }
        if let Some(key) = get(&["WEATHER_API_KEY"]) {
            self.tools.weather_api_key = Some(key);
        }
        if let Some(retries) = get(&["MAX_RETRIES"]).and_then(|v| v.parse::<u32>().ok()) {
            self.tools.max_retries = retries;
        }
        if let Some(timeout) = get(&["REQUEST_TIMEOUT"]).and_then(|v| v.parse::<u64>().ok()) {
            self.tools.request_timeout_secs = timeout;
        }

        if let Some(host) = get(&["OPSASSIST_GATEWAY_HOST", "HOST"]) {
            self.gateway.host = host;
        }
        if let Some(port) =
            get(&["OPSASSIST_GATEWAY_PORT", "PORT"]).and_then(|v| v.parse::<u16>().ok())
        {
            self.gateway.port = port;
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> anyhow::Error {
    ConfigError::Validation(message.into()).into()
}

fn check_url(label: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| invalid(format!("{label}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("{label} must use http or https")));
    }
    Ok(())
}
