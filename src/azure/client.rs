use crate::config::Settings;
use crate::error::{DashboardError, FetchError, Result};
use super::models::{filter_builds_by_branches, Build, ListResponse, PullRequest, Release};
use super::rate_limit::RateLimiter;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

const API_VERSION: &str = "7.0";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Upper bound on `$top` when over-fetching builds for client-side branch filtering.
const MAX_BRANCH_FETCH: usize = 100;
const BRANCH_OVERFETCH_FACTOR: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): `base × 2^(retry-1)`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let multiplier = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(multiplier)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub organization: String,
    pub base_url: String,
    pub release_base_url: Option<String>,
    pub pat: String,
    pub requests_per_second: f64,
    pub burst_size: u32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            organization: settings.azure_devops.organization.clone(),
            base_url: settings.azure_devops.base_url.clone(),
            release_base_url: settings.azure_devops.release_base_url.clone(),
            pat: settings.azure_devops.pat.clone(),
            requests_per_second: settings.rate_limiting.requests_per_second,
            burst_size: settings.rate_limiting.burst_size,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Builds browser links for records whose payload carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalUrls {
    base_url: Url,
    organization: String,
}

impl PortalUrls {
    pub fn new(base_url: &str, organization: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            organization: organization.to_string(),
        })
    }

    pub fn build(&self, project: &str, build_id: u64) -> String {
        let mut url = self.project_url(project, &["_build", "results"]);
        url.query_pairs_mut()
            .append_pair("buildId", &build_id.to_string());
        url.to_string()
    }

    pub fn release(&self, project: &str, release_id: u64) -> String {
        let mut url = self.project_url(project, &["_releaseProgress"]);
        url.query_pairs_mut()
            .append_pair("releaseId", &release_id.to_string());
        url.to_string()
    }

    pub fn pull_request(&self, project: &str, repository: &str, pull_request_id: u64) -> String {
        let id = pull_request_id.to_string();
        self.project_url(project, &["_git", repository, "pullrequest", id.as_str()])
            .to_string()
    }

    fn project_url(&self, project: &str, segments: &[&str]) -> Url {
        project_url(&self.base_url, &self.organization, project, segments)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| DashboardError::Config(format!("Invalid base URL '{}': {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(DashboardError::Config(format!(
            "Base URL '{}' cannot carry a path",
            raw
        )));
    }
    Ok(url)
}

fn project_url(base: &Url, organization: &str, project: &str, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // parse_base_url rejected cannot-be-a-base URLs, so the segments are always editable
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty()
            .push(organization)
            .push(project)
            .extend(segments);
    }
    url
}

/// Releases live on a separate host: `dev.azure.com` becomes `vsrm.dev.azure.com`.
pub fn derive_release_base(base: &Url) -> Url {
    let mut release = base.clone();
    if base.host_str() == Some("dev.azure.com") {
        let _ = release.set_host(Some("vsrm.dev.azure.com"));
    }
    release
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Clone)]
pub struct AzureDevOpsClient {
    client: Client,
    base_url: Url,
    release_base_url: Url,
    organization: String,
    pat: String,
    limiter: Arc<RateLimiter>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl AzureDevOpsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        header::HeaderValue::from_str(&config.pat)
            .map_err(|e| DashboardError::InvalidToken(e.to_string()))?;

        let base_url = parse_base_url(&config.base_url)?;
        let release_base_url = match &config.release_base_url {
            Some(raw) => parse_base_url(raw)?,
            None => derive_release_base(&base_url),
        };

        let client = Client::builder()
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            release_base_url,
            organization: config.organization,
            pat: config.pat,
            limiter: Arc::new(RateLimiter::new(
                config.requests_per_second,
                config.burst_size,
            )),
            timeout: config.timeout,
            retry: config.retry,
        })
    }

    pub fn portal_urls(&self) -> PortalUrls {
        PortalUrls {
            base_url: self.base_url.clone(),
            organization: self.organization.clone(),
        }
    }

    pub async fn get_builds(
        &self,
        project: &str,
        definition_ids: &[u32],
        branches: &[String],
        max_count: usize,
    ) -> std::result::Result<Vec<Build>, FetchError> {
        // The builds endpoint cannot filter by several branches, so fetch extra and
        // filter locally.
        let fetch_count = if branches.is_empty() {
            max_count
        } else {
            max_count
                .saturating_mul(BRANCH_OVERFETCH_FACTOR)
                .min(MAX_BRANCH_FETCH)
        };

        let mut url = self.api_url(&self.base_url, project, &["build", "builds"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("$top", &fetch_count.to_string())
                .append_pair("statusFilter", "all")
                .append_pair("queryOrder", "queueTimeDescending");
            if !definition_ids.is_empty() {
                query.append_pair("definitions", &join_ids(definition_ids));
            }
        }

        let response: ListResponse<Build> = self.get_json(url).await?;
        let mut builds = filter_builds_by_branches(response.value, branches);
        builds.truncate(max_count);
        Ok(builds)
    }

    pub async fn get_releases(
        &self,
        project: &str,
        definition_ids: &[u32],
        max_count: usize,
    ) -> std::result::Result<Vec<Release>, FetchError> {
        let mut url = self.api_url(&self.release_base_url, project, &["release", "releases"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("$top", &max_count.to_string())
                .append_pair("$expand", "environments");
            if !definition_ids.is_empty() {
                query.append_pair("definitionId", &join_ids(definition_ids));
            }
        }

        let response: ListResponse<Release> = self.get_json(url).await?;
        Ok(response.value)
    }

    pub async fn get_pull_requests(
        &self,
        project: &str,
        max_count: usize,
    ) -> std::result::Result<Vec<PullRequest>, FetchError> {
        let mut url = self.api_url(&self.base_url, project, &["git", "pullrequests"]);
        url.query_pairs_mut()
            .append_pair("searchCriteria.status", "active")
            .append_pair("$top", &max_count.to_string());

        let response: ListResponse<PullRequest> = self.get_json(url).await?;
        let mut pull_requests = response.value;
        pull_requests.truncate(max_count);
        Ok(pull_requests)
    }

    fn api_url(&self, base: &Url, project: &str, segments: &[&str]) -> Url {
        let mut path = vec!["_apis"];
        path.extend_from_slice(segments);
        let mut url = project_url(base, &self.organization, project, &path);
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        url
    }

    /// Rate-limited GET with retries, bounded by the client deadline.
    async fn get_json<T>(&self, url: Url) -> std::result::Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let deadline = Instant::now() + self.timeout;
        match tokio::time::timeout_at(deadline, self.get_with_retry(&url, deadline)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(url = %url.path(), "request deadline exceeded");
                Err(FetchError::Canceled)
            }
        }
    }

    async fn get_with_retry<T>(&self, url: &Url, deadline: Instant) -> std::result::Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        self.limiter.acquire(deadline).await?;

        let mut last_error = FetchError::Canceled;
        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay_for(attempt);
                tracing::warn!(
                    url = %url.path(),
                    attempt = attempt + 1,
                    ?delay,
                    error = %last_error,
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
            }

            match self.get_once(url).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => last_error = err,
            }
        }

        tracing::warn!(
            url = %url.path(),
            attempts = self.retry.max_attempts,
            error = %last_error,
            "request failed"
        );
        Err(last_error)
    }

    async fn get_once<T>(&self, url: &Url) -> std::result::Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(url = %url.path(), "GET");
        let response = self
            .client
            .get(url.clone())
            .basic_auth("", Some(&self.pat))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
