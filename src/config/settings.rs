use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub azure_devops: AzureDevOpsConfig,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub rate_limiting: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureDevOpsConfig {
    #[serde(default)]
    pub organization: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub pat: String,
    /// Overrides the release host derived from `base_url`.
    #[serde(default)]
    pub release_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub build_definitions: Vec<u32>,
    #[serde(default)]
    pub release_definitions: Vec<u32>,
    #[serde(default)]
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Seconds between automatic refreshes; 0 turns auto refresh off.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    #[serde(default = "default_max_items_per_project")]
    pub max_items_per_project: usize,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

// Default functions
fn default_base_url() -> String {
    "https://dev.azure.com".to_string()
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_max_items_per_project() -> usize {
    10
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_requests_per_second() -> f64 {
    5.0
}

fn default_burst_size() -> u32 {
    10
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            max_items_per_project: default_max_items_per_project(),
            date_format: default_date_format(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

impl DisplayConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }
}

impl Settings {
    /// Checks every field and reports all problems at once, joined by `"; "`.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let mut errors = Vec::new();

        if self.azure_devops.organization.is_empty() {
            errors.push("azure_devops.organization is required".to_string());
        }

        if self.azure_devops.pat.is_empty() {
            errors.push(
                "azure_devops.pat is required (set AZURE_DEVOPS_PAT environment variable)"
                    .to_string(),
            );
        }

        if !has_http_scheme(&self.azure_devops.base_url) {
            errors.push("azure_devops.base_url must start with http:// or https://".to_string());
        }

        if let Some(release_url) = &self.azure_devops.release_base_url {
            if !has_http_scheme(release_url) {
                errors.push(
                    "azure_devops.release_base_url must start with http:// or https://"
                        .to_string(),
                );
            }
        }

        if self.projects.is_empty() {
            errors.push("at least one project must be configured".to_string());
        }

        let mut seen = HashSet::new();
        for (i, project) in self.projects.iter().enumerate() {
            if project.name.is_empty() {
                errors.push(format!("projects[{}].name is required", i));
            } else if !seen.insert(project.name.as_str()) {
                errors.push(format!("projects[{}].name '{}' is duplicated", i, project.name));
            }
        }

        if self.display.max_items_per_project < 1 {
            errors.push("display.max_items_per_project must be at least 1".to_string());
        }

        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            errors.push(format!(
                "display.date_format '{}' is not a valid strftime format",
                self.display.date_format
            ));
        }

        if !(self.rate_limiting.requests_per_second > 0.0) {
            errors.push("rate_limiting.requests_per_second must be positive".to_string());
        }

        if self.rate_limiting.burst_size < 1 {
            errors.push("rate_limiting.burst_size must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }
}

fn has_http_scheme(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
