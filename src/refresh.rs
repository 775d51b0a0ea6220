use crate::azure::{AzureDevOpsClient, Build, PullRequest, Release};
use crate::config::ProjectConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Budget for one fetch operation, retries included.
pub const FETCH_DEADLINE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Builds,
    Releases,
    PullRequests,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Builds,
        ResourceKind::Releases,
        ResourceKind::PullRequests,
    ];

    pub fn index(self) -> usize {
        match self {
            ResourceKind::Builds => 0,
            ResourceKind::Releases => 1,
            ResourceKind::PullRequests => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Builds => "Builds",
            ResourceKind::Releases => "Releases",
            ResourceKind::PullRequests => "Pull Requests",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub project: String,
    pub kind: ResourceKind,
}

impl FetchKey {
    pub fn new(project: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            project: project.into(),
            kind,
        }
    }

    /// Every (project, kind) pair, projects in configuration order.
    pub fn all_for(projects: &[ProjectConfig]) -> Vec<FetchKey> {
        projects
            .iter()
            .flat_map(|project| {
                ResourceKind::ALL
                    .iter()
                    .map(move |kind| FetchKey::new(project.name.clone(), *kind))
            })
            .collect()
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Startup,
    Timer,
    Manual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceData {
    Builds(Vec<Build>),
    Releases(Vec<Release>),
    PullRequests(Vec<PullRequest>),
}

impl ResourceData {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceData::Builds(_) => ResourceKind::Builds,
            ResourceData::Releases(_) => ResourceKind::Releases,
            ResourceData::PullRequests(_) => ResourceKind::PullRequests,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResourceData::Builds(items) => items.len(),
            ResourceData::Releases(items) => items.len(),
            ResourceData::PullRequests(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub key: FetchKey,
    pub outcome: Result<ResourceData, FetchError>,
}

/// Where resource lists come from. The dashboard only talks to this seam, which lets
/// tests swap the HTTP client for an in-memory source.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch_builds(
        &self,
        project: &ProjectConfig,
        max_count: usize,
    ) -> Result<Vec<Build>, FetchError>;

    async fn fetch_releases(
        &self,
        project: &ProjectConfig,
        max_count: usize,
    ) -> Result<Vec<Release>, FetchError>;

    async fn fetch_pull_requests(
        &self,
        project: &ProjectConfig,
        max_count: usize,
    ) -> Result<Vec<PullRequest>, FetchError>;
}

#[async_trait]
impl ResourceSource for AzureDevOpsClient {
    async fn fetch_builds(
        &self,
        project: &ProjectConfig,
        max_count: usize,
    ) -> Result<Vec<Build>, FetchError> {
        self.get_builds(
            &project.name,
            &project.build_definitions,
            &project.branches,
            max_count,
        )
        .await
    }

    async fn fetch_releases(
        &self,
        project: &ProjectConfig,
        max_count: usize,
    ) -> Result<Vec<Release>, FetchError> {
        self.get_releases(&project.name, &project.release_definitions, max_count)
            .await
    }

    async fn fetch_pull_requests(
        &self,
        project: &ProjectConfig,
        max_count: usize,
    ) -> Result<Vec<PullRequest>, FetchError> {
        self.get_pull_requests(&project.name, max_count).await
    }
}

/// Fans fetches out as independent tasks. Results come back through the channel and
/// are merged by the event loop; the tasks never touch view state.
pub struct Orchestrator {
    source: Arc<dyn ResourceSource>,
    projects: HashMap<String, ProjectConfig>,
    max_items: usize,
    deadline: Duration,
    tx: mpsc::UnboundedSender<FetchResult>,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn ResourceSource>,
        projects: &[ProjectConfig],
        max_items: usize,
        tx: mpsc::UnboundedSender<FetchResult>,
    ) -> Self {
        Self {
            source,
            projects: projects
                .iter()
                .map(|p| (p.name.clone(), p.clone()))
                .collect(),
            max_items,
            deadline: FETCH_DEADLINE,
            tx,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Spawns one task per key and returns how many were started.
    pub fn dispatch(&self, keys: Vec<FetchKey>) -> usize {
        let mut spawned = 0;
        for key in keys {
            let Some(project) = self.projects.get(&key.project).cloned() else {
                tracing::warn!(%key, "no configured project for fetch key");
                continue;
            };

            let source = Arc::clone(&self.source);
            let tx = self.tx.clone();
            let max_items = self.max_items;
            let deadline = self.deadline;
            tokio::spawn(async move {
                let fetch_key = key.clone();
                let fetch = tokio::spawn(async move {
                    fetch_one(source.as_ref(), &project, fetch_key, max_items, deadline).await
                });
                // A panicking fetch still has to report, or its key stays Loading
                let result = match fetch.await {
                    Ok(result) => result,
                    Err(err) => {
                        tracing::error!(%key, error = %err, "fetch task failed");
                        FetchResult {
                            key,
                            outcome: Err(FetchError::TaskFailed(err.to_string())),
                        }
                    }
                };
                // The receiver only goes away when the app is shutting down
                let _ = tx.send(result);
            });
            spawned += 1;
        }

        tracing::debug!(spawned, "dispatched fetch tasks");
        spawned
    }
}

pub async fn fetch_one(
    source: &dyn ResourceSource,
    project: &ProjectConfig,
    key: FetchKey,
    max_items: usize,
    deadline: Duration,
) -> FetchResult {
    let fetch = async {
        match key.kind {
            ResourceKind::Builds => source
                .fetch_builds(project, max_items)
                .await
                .map(ResourceData::Builds),
            ResourceKind::Releases => source
                .fetch_releases(project, max_items)
                .await
                .map(ResourceData::Releases),
            ResourceKind::PullRequests => source
                .fetch_pull_requests(project, max_items)
                .await
                .map(ResourceData::PullRequests),
        }
    };

    let outcome = match tokio::time::timeout(deadline, fetch).await {
        Ok(outcome) => outcome,
        Err(_) => Err(FetchError::Canceled),
    };

    match &outcome {
        Ok(data) => tracing::debug!(%key, items = data.len(), "fetch completed"),
        Err(err) => tracing::warn!(%key, error = %err, "fetch failed"),
    }

    FetchResult { key, outcome }
}
