pub mod loader;
pub mod settings;

pub use loader::{expand_env_vars, load_config, parse_config};
pub use settings::{AzureDevOpsConfig, DisplayConfig, ProjectConfig, RateLimitConfig, Settings};
