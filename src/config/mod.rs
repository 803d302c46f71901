pub mod schema;

pub use schema::{
    Config, ExecutorConfig, GatewayConfig, LlmConfig, LlmErrorPolicy, ReliabilityConfig,
    ToolsConfig, VerifierConfig,
};
