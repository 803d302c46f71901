pub mod factory;
pub mod github;
pub mod http;
pub mod params;
pub mod registry;
pub mod traits;
pub mod weather;

pub use factory::default_registry;
pub use github::GitHubSearchTool;
pub use http::HttpFetcher;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolOutput, ToolSpec};
pub use weather::WeatherTool;
