pub mod client;
pub mod models;
pub mod rate_limit;

pub use client::{AzureDevOpsClient, ClientConfig, PortalUrls, RetryPolicy};
pub use models::*;
pub use rate_limit::RateLimiter;
