//! Language-model access: an OpenAI-compatible chat provider behind the
//! [`Provider`] trait, a retrying decorator, and [`LlmClient`], which turns
//! chat replies into JSON objects for the planner and verifier.

// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod http_client;
pub mod json;
pub mod scrub;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// ── Decorator layers ────────────────────────────────────────────────────────
pub mod factory;
pub mod reliable;

// ── Provider implementations ────────────────────────────────────────────────
pub mod client;
pub mod compatible;

pub use client::LlmClient;
pub use compatible::OpenAiCompatibleProvider;
pub use factory::create_provider;
pub use http_client::build_http_client;
pub use json::extract_json_object;
pub use reliable::ReliableProvider;
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::Provider;
