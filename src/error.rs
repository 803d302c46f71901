use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `opsassist`.
///
/// Each pipeline stage defines its own error variant. Library callers can match
/// on these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains and attaches these as sources.
#[derive(Debug, Error)]
pub enum OpsError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Planning ────────────────────────────────────────────────────────
    #[error("plan: {0}")]
    Plan(#[from] PlanError),

    // ── Tools ───────────────────────────────────────────────────────────
    #[error("tool: {0}")]
    Tool(#[from] ToolError),

    // ── Verification ────────────────────────────────────────────────────
    #[error("verify: {0}")]
    Verify(#[from] VerifyError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} API key not set")]
    MissingApiKey { provider: String },

    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned no content")]
    EmptyResponse { provider: String },

    #[error("no JSON object found in LLM response: {preview}")]
    NoJson { preview: String },

    #[error("Failed to parse LLM response as JSON: {message}")]
    InvalidJson { message: String, preview: String },
}

// ─── Planning errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("plan `steps` must be an array")]
    StepsNotArray,

    #[error("plan step {index} is invalid: {reason}")]
    InvalidStep { index: usize, reason: String },
}

// ─── Tool errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    NotFound { name: String },

    #[error("Request failed after {attempts} attempts: {message}")]
    RequestFailed { attempts: u32, message: String },
}

// ─── Verification errors ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("result formatting failed: {0}")]
    Formatting(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, OpsError>;
