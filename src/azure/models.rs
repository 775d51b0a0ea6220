use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Declares a string-backed vendor enum. Values the API returns that are not listed
/// land in `Unknown` with the raw string preserved.
macro_rules! vendor_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Unknown(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vendor_enum!(
    BuildStatus {
        None => "none",
        InProgress => "inProgress",
        Completed => "completed",
        Cancelling => "cancelling",
        Postponed => "postponed",
        NotStarted => "notStarted",
    }
);

vendor_enum!(
    /// Only meaningful once the build status is `completed`.
    BuildResult {
        None => "none",
        Succeeded => "succeeded",
        PartiallySucceeded => "partiallySucceeded",
        Failed => "failed",
        Canceled => "canceled",
    }
);

vendor_enum!(
    EnvironmentStatus {
        NotStarted => "notStarted",
        InProgress => "inProgress",
        Succeeded => "succeeded",
        Canceled => "canceled",
        Rejected => "rejected",
        Queued => "queued",
        Scheduled => "scheduled",
        PartiallySucceeded => "partiallySucceeded",
        Undefined => "undefined",
    }
);

vendor_enum!(
    ReleaseStatus {
        Active => "active",
        Draft => "draft",
        Abandoned => "abandoned",
        Undefined => "undefined",
    }
);

vendor_enum!(
    PullRequestStatus {
        Active => "active",
        Abandoned => "abandoned",
        Completed => "completed",
        NotSet => "notSet",
    }
);

impl Default for BuildStatus {
    fn default() -> Self {
        BuildStatus::None
    }
}

impl Default for BuildResult {
    fn default() -> Self {
        BuildResult::None
    }
}

impl Default for EnvironmentStatus {
    fn default() -> Self {
        EnvironmentStatus::Undefined
    }
}

impl Default for ReleaseStatus {
    fn default() -> Self {
        ReleaseStatus::Undefined
    }
}

impl Default for PullRequestStatus {
    fn default() -> Self {
        PullRequestStatus::NotSet
    }
}

impl EnvironmentStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            EnvironmentStatus::Succeeded => "✓",
            EnvironmentStatus::Rejected | EnvironmentStatus::Canceled => "✗",
            EnvironmentStatus::InProgress => "●",
            EnvironmentStatus::Queued | EnvironmentStatus::Scheduled => "○",
            EnvironmentStatus::PartiallySucceeded => "◐",
            _ => "-",
        }
    }
}

/// Vendor list envelope: `{"count": n, "value": [...]}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub count: usize,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub unique_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Link {
    #[serde(default)]
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WebLinks {
    #[serde(default)]
    pub web: Link,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Definition {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: u64,
    #[serde(default)]
    pub build_number: String,
    #[serde(default)]
    pub status: BuildStatus,
    #[serde(default)]
    pub result: BuildResult,
    #[serde(default)]
    pub queue_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub definition: Definition,
    #[serde(default)]
    pub source_branch: String,
    #[serde(default)]
    pub source_version: String,
    #[serde(default)]
    pub requested_for: Identity,
    #[serde(default, rename = "_links")]
    pub links: WebLinks,
}

impl Build {
    /// Branch name without its `refs/heads/` or `refs/pull/` prefix.
    pub fn branch_name(&self) -> &str {
        normalize_branch(&self.source_branch)
    }

    pub fn duration(&self) -> Duration {
        self.duration_at(Utc::now())
    }

    /// Elapsed time, measured up to `now` while the build has not finished.
    pub fn duration_at(&self, now: DateTime<Utc>) -> Duration {
        let Some(start) = self.start_time else {
            return Duration::ZERO;
        };
        let end = self.finish_time.unwrap_or(now);
        end.signed_duration_since(start)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn status_text(&self) -> &str {
        if self.status == BuildStatus::Completed {
            self.result.as_str()
        } else {
            self.status.as_str()
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == BuildStatus::InProgress
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == BuildStatus::Completed && self.result == BuildResult::Succeeded
    }

    pub fn is_failed(&self) -> bool {
        self.status == BuildStatus::Completed && self.result == BuildResult::Failed
    }
}

pub fn normalize_branch(branch: &str) -> &str {
    branch
        .strip_prefix("refs/heads/")
        .or_else(|| branch.strip_prefix("refs/pull/"))
        .unwrap_or(branch)
}

/// Keeps builds whose source branch matches one of `branches`, which may be given
/// either bare (`main`) or fully qualified (`refs/heads/main`).
pub fn filter_builds_by_branches(builds: Vec<Build>, branches: &[String]) -> Vec<Build> {
    if branches.is_empty() {
        return builds;
    }

    let allowed: Vec<&str> = branches
        .iter()
        .map(|b| b.strip_prefix("refs/heads/").unwrap_or(b))
        .collect();

    builds
        .into_iter()
        .filter(|build| {
            let source = build.source_branch.as_str();
            let bare = source.strip_prefix("refs/heads/");
            allowed.iter().any(|name| source == *name || bare == Some(*name))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseEnvironment {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: EnvironmentStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ReleaseStatus,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub release_definition: Definition,
    #[serde(default)]
    pub environments: Vec<ReleaseEnvironment>,
    #[serde(default)]
    pub created_by: Identity,
    #[serde(default, rename = "_links")]
    pub links: WebLinks,
}

impl Release {
    /// Rolls the environment statuses up into one. In-progress wins over failures,
    /// failures over queued work, and only an all-succeeded release is `Succeeded`.
    pub fn overall_status(&self) -> EnvironmentStatus {
        if self.environments.is_empty() {
            return EnvironmentStatus::Undefined;
        }

        let mut has_in_progress = false;
        let mut has_failed = false;
        let mut has_queued = false;
        let mut all_succeeded = true;

        for env in &self.environments {
            match env.status {
                EnvironmentStatus::InProgress => has_in_progress = true,
                EnvironmentStatus::Rejected | EnvironmentStatus::Canceled => has_failed = true,
                EnvironmentStatus::Queued | EnvironmentStatus::Scheduled => has_queued = true,
                _ => {}
            }
            if env.status != EnvironmentStatus::Succeeded {
                all_succeeded = false;
            }
        }

        if has_in_progress {
            EnvironmentStatus::InProgress
        } else if has_failed {
            EnvironmentStatus::Rejected
        } else if has_queued {
            EnvironmentStatus::Queued
        } else if all_succeeded {
            EnvironmentStatus::Succeeded
        } else {
            EnvironmentStatus::NotStarted
        }
    }

    pub fn environment_summary(&self) -> String {
        if self.environments.is_empty() {
            return "-".to_string();
        }

        self.environments
            .iter()
            .map(|env| format!("{}:{}", env.name, env.status.symbol()))
            .collect::<Vec<_>>()
            .join(" → ")
    }

    pub fn is_active(&self) -> bool {
        self.status == ReleaseStatus::Active
    }

    pub fn has_failed_environment(&self) -> bool {
        self.environments.iter().any(|env| {
            matches!(
                env.status,
                EnvironmentStatus::Rejected | EnvironmentStatus::Canceled
            )
        })
    }

    pub fn has_in_progress_environment(&self) -> bool {
        self.environments
            .iter()
            .any(|env| env.status == EnvironmentStatus::InProgress)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub vote: i32,
    #[serde(default)]
    pub is_required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteKind {
    Approved,
    Rejected,
    Waiting,
    NoVote,
}

impl VoteKind {
    /// Azure DevOps votes: 10 approved, 5 approved with suggestions, 0 no vote,
    /// -5 waiting for author, -10 rejected.
    pub fn classify(vote: i32) -> Self {
        match vote {
            v if v >= 10 || v == 5 => VoteKind::Approved,
            v if v <= -10 => VoteKind::Rejected,
            -5 => VoteKind::Waiting,
            _ => VoteKind::NoVote,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewerSummary {
    pub approved: usize,
    pub rejected: usize,
    pub waiting: usize,
    pub no_vote: usize,
}

impl ReviewerSummary {
    pub fn from_reviewers(reviewers: &[Reviewer]) -> Self {
        reviewers
            .iter()
            .fold(Self::default(), |mut summary, reviewer| {
                match VoteKind::classify(reviewer.vote) {
                    VoteKind::Approved => summary.approved += 1,
                    VoteKind::Rejected => summary.rejected += 1,
                    VoteKind::Waiting => summary.waiting += 1,
                    VoteKind::NoVote => summary.no_vote += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.approved + self.rejected + self.waiting + self.no_vote
    }
}

impl fmt::Display for ReviewerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        if total == 0 {
            f.write_str("-")
        } else if self.rejected > 0 {
            write!(f, "{}/{} (✗{})", self.approved, total, self.rejected)
        } else if self.waiting > 0 {
            write!(f, "{}/{} (○{})", self.approved, total, self.waiting)
        } else if self.approved == total {
            write!(f, "{}/{} ✓", self.approved, total)
        } else {
            write!(f, "{}/{}", self.approved, total)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Repository {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: PullRequestStatus,
    #[serde(default)]
    pub created_by: Identity,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_ref_name: String,
    #[serde(default)]
    pub target_ref_name: String,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub merge_status: Option<String>,
    #[serde(default)]
    pub reviewers: Vec<Reviewer>,
    #[serde(default)]
    pub repository: Repository,
}

impl PullRequest {
    pub fn source_branch(&self) -> &str {
        normalize_branch(&self.source_ref_name)
    }

    pub fn target_branch(&self) -> &str {
        normalize_branch(&self.target_ref_name)
    }

    pub fn branch_summary(&self) -> String {
        format!("{} -> {}", self.source_branch(), self.target_branch())
    }

    pub fn reviewer_summary(&self) -> ReviewerSummary {
        ReviewerSummary::from_reviewers(&self.reviewers)
    }

    pub fn has_conflicts(&self) -> bool {
        self.merge_status.as_deref() == Some("conflicts")
    }

    pub fn status_display(&self) -> &str {
        if self.is_draft {
            "draft"
        } else if self.has_conflicts() {
            "conflicts"
        } else {
            self.status.as_str()
        }
    }

    /// Every reviewer voted at least "approved with suggestions". No reviewers means
    /// nobody approved.
    pub fn is_approved(&self) -> bool {
        !self.reviewers.is_empty() && self.reviewers.iter().all(|r| r.vote >= 5)
    }

    pub fn has_rejections(&self) -> bool {
        self.reviewers.iter().any(|r| r.vote <= -10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn build_on(branch: &str) -> Build {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "sourceBranch": branch,
        }))
        .unwrap()
    }

    fn release_with(statuses: &[EnvironmentStatus]) -> Release {
        Release {
            id: 7,
            name: "Release-7".to_string(),
            status: ReleaseStatus::Active,
            created_on: None,
            modified_on: None,
            release_definition: Definition::default(),
            environments: statuses
                .iter()
                .enumerate()
                .map(|(i, status)| ReleaseEnvironment {
                    id: i as u64,
                    name: format!("env{}", i),
                    status: status.clone(),
                })
                .collect(),
            created_by: Identity::default(),
            links: WebLinks::default(),
        }
    }

    fn pr_with_votes(votes: &[i32]) -> PullRequest {
        serde_json::from_value(serde_json::json!({
            "pullRequestId": 42,
            "title": "Add caching",
            "status": "active",
            "sourceRefName": "refs/heads/feature/cache",
            "targetRefName": "refs/heads/main",
            "reviewers": votes
                .iter()
                .map(|v| serde_json::json!({"displayName": "r", "vote": v}))
                .collect::<Vec<_>>(),
            "repository": {"id": "abc", "name": "web"}
        }))
        .unwrap()
    }

    #[test]
    fn test_status_deserialization() {
        let status: BuildStatus = serde_json::from_str(r#""inProgress""#).unwrap();
        assert_eq!(status, BuildStatus::InProgress);

        let result: BuildResult = serde_json::from_str(r#""partiallySucceeded""#).unwrap();
        assert_eq!(result, BuildResult::PartiallySucceeded);

        let env: EnvironmentStatus = serde_json::from_str(r#""scheduled""#).unwrap();
        assert_eq!(env, EnvironmentStatus::Scheduled);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: PullRequestStatus = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(status, PullRequestStatus::Unknown("all".to_string()));
        assert_eq!(status.as_str(), "all");
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""all""#);
    }

    #[test]
    fn test_status_values_are_case_sensitive() {
        let status: BuildStatus = serde_json::from_str(r#""Completed""#).unwrap();
        assert_eq!(status, BuildStatus::Unknown("Completed".to_string()));
    }

    #[test]
    fn test_environment_symbols() {
        assert_eq!(EnvironmentStatus::Succeeded.symbol(), "✓");
        assert_eq!(EnvironmentStatus::Rejected.symbol(), "✗");
        assert_eq!(EnvironmentStatus::Canceled.symbol(), "✗");
        assert_eq!(EnvironmentStatus::InProgress.symbol(), "●");
        assert_eq!(EnvironmentStatus::Queued.symbol(), "○");
        assert_eq!(EnvironmentStatus::PartiallySucceeded.symbol(), "◐");
        assert_eq!(EnvironmentStatus::NotStarted.symbol(), "-");
    }

    #[test]
    fn test_build_deserialization() {
        let json = r#"{
            "id": 1234,
            "buildNumber": "20240101.3",
            "status": "completed",
            "result": "failed",
            "queueTime": "2024-01-01T10:00:00Z",
            "startTime": "2024-01-01T10:01:00.123Z",
            "finishTime": "2024-01-01T10:06:30Z",
            "definition": {"id": 12, "name": "web-ci"},
            "sourceBranch": "refs/heads/main",
            "sourceVersion": "abc123",
            "requestedFor": {"displayName": "Dana", "uniqueName": "dana@contoso.com"},
            "_links": {"web": {"href": "https://dev.azure.com/contoso/Web/_build/results?buildId=1234"}}
        }"#;

        let build: Build = serde_json::from_str(json).unwrap();
        assert_eq!(build.id, 1234);
        assert_eq!(build.definition.name, "web-ci");
        assert_eq!(build.branch_name(), "main");
        assert_eq!(build.status_text(), "failed");
        assert!(build.is_failed());
        assert!(!build.is_running());
        assert_eq!(build.requested_for.display_name, "Dana");
        assert!(build.links.web.href.ends_with("buildId=1234"));
    }

    #[test]
    fn test_build_with_missing_optional_fields() {
        let build: Build = serde_json::from_str(r#"{"id": 5, "status": "notStarted"}"#).unwrap();
        assert_eq!(build.status, BuildStatus::NotStarted);
        assert_eq!(build.result, BuildResult::None);
        assert!(build.start_time.is_none());
        assert_eq!(build.duration(), Duration::ZERO);
        assert_eq!(build.status_text(), "notStarted");
    }

    #[test]
    fn test_branch_name_normalization() {
        assert_eq!(build_on("refs/heads/main").branch_name(), "main");
        assert_eq!(build_on("refs/pull/17/merge").branch_name(), "17/merge");
        assert_eq!(build_on("develop").branch_name(), "develop");
    }

    #[test]
    fn test_finished_build_duration() {
        let mut build = build_on("main");
        build.start_time = Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        build.finish_time = Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 30).unwrap());
        assert_eq!(build.duration(), Duration::from_secs(330));
    }

    #[test]
    fn test_running_build_duration_uses_now() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 2, 0).unwrap();
        let mut build = build_on("main");
        build.status = BuildStatus::InProgress;
        build.start_time = Some(start);

        assert_eq!(build.duration_at(now), Duration::from_secs(120));
    }

    #[test]
    fn test_running_build_duration_within_call_window() {
        let mut build = build_on("main");
        build.start_time = Some(Utc::now() - chrono::Duration::seconds(90));

        let before = Utc::now();
        let duration = build.duration();
        let after = Utc::now();

        let start = build.start_time.unwrap();
        let lower = (before - start).to_std().unwrap();
        let upper = (after - start).to_std().unwrap();
        assert!(duration >= lower && duration <= upper);
    }

    #[test]
    fn test_finish_before_start_is_zero() {
        let mut build = build_on("main");
        build.start_time = Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        build.finish_time = Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        assert_eq!(build.duration(), Duration::ZERO);
    }

    #[test]
    fn test_branch_filter_accepts_both_forms() {
        let builds = vec![
            build_on("refs/heads/main"),
            build_on("refs/heads/feature/x"),
            build_on("main"),
            build_on("refs/pull/3/merge"),
        ];

        let bare = filter_builds_by_branches(builds.clone(), &["main".to_string()]);
        let qualified = filter_builds_by_branches(builds, &["refs/heads/main".to_string()]);

        assert_eq!(bare.len(), 2);
        assert_eq!(bare, qualified);
    }

    #[test]
    fn test_branch_filter_without_allow_list_keeps_everything() {
        let builds = vec![build_on("refs/heads/main"), build_on("refs/heads/dev")];
        assert_eq!(filter_builds_by_branches(builds, &[]).len(), 2);
    }

    #[test]
    fn test_release_overall_status_priority() {
        use EnvironmentStatus::*;

        assert_eq!(
            release_with(&[Succeeded, InProgress, Rejected]).overall_status(),
            InProgress
        );
        assert_eq!(release_with(&[Succeeded, Canceled, Queued]).overall_status(), Rejected);
        assert_eq!(release_with(&[Succeeded, Scheduled]).overall_status(), Queued);
        assert_eq!(release_with(&[Succeeded, Succeeded]).overall_status(), Succeeded);
        assert_eq!(
            release_with(&[Succeeded, PartiallySucceeded]).overall_status(),
            NotStarted
        );
        assert_eq!(release_with(&[NotStarted]).overall_status(), NotStarted);
        assert_eq!(release_with(&[]).overall_status(), Undefined);
    }

    #[test]
    fn test_release_environment_summary() {
        use EnvironmentStatus::*;

        let release = release_with(&[Succeeded, InProgress]);
        assert_eq!(release.environment_summary(), "env0:✓ → env1:●");
        assert_eq!(release_with(&[]).environment_summary(), "-");
        assert!(release.has_in_progress_environment());
        assert!(!release.has_failed_environment());
        assert!(release.is_active());
    }

    #[test]
    fn test_release_deserialization() {
        let json = r#"{
            "id": 88,
            "name": "Release-88",
            "status": "active",
            "createdOn": "2024-02-01T08:00:00Z",
            "releaseDefinition": {"id": 3, "name": "web-cd"},
            "environments": [
                {"id": 1, "name": "dev", "status": "succeeded"},
                {"id": 2, "name": "prod", "status": "rejected"}
            ],
            "createdBy": {"displayName": "Release Bot"}
        }"#;

        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.release_definition.name, "web-cd");
        assert_eq!(release.environments.len(), 2);
        assert_eq!(release.overall_status(), EnvironmentStatus::Rejected);
        assert!(release.links.web.href.is_empty());
    }

    #[test]
    fn test_vote_classification() {
        assert_eq!(VoteKind::classify(10), VoteKind::Approved);
        assert_eq!(VoteKind::classify(5), VoteKind::Approved);
        assert_eq!(VoteKind::classify(0), VoteKind::NoVote);
        assert_eq!(VoteKind::classify(-5), VoteKind::Waiting);
        assert_eq!(VoteKind::classify(-10), VoteKind::Rejected);
    }

    #[test]
    fn test_reviewer_summary_rejection_dominates() {
        let pr = pr_with_votes(&[10, 5, -10]);
        let summary = pr.reviewer_summary();
        assert_eq!(summary.approved, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.to_string(), "2/3 (✗1)");
    }

    #[test]
    fn test_reviewer_summary_variants() {
        assert_eq!(pr_with_votes(&[10, -5, -10]).reviewer_summary().to_string(), "1/3 (✗1)");
        assert_eq!(pr_with_votes(&[10, -5]).reviewer_summary().to_string(), "1/2 (○1)");
        assert_eq!(pr_with_votes(&[10, 5]).reviewer_summary().to_string(), "2/2 ✓");
        assert_eq!(pr_with_votes(&[10, 0]).reviewer_summary().to_string(), "1/2");
        assert_eq!(pr_with_votes(&[]).reviewer_summary().to_string(), "-");
    }

    #[test]
    fn test_pull_request_approval() {
        assert!(pr_with_votes(&[10, 5]).is_approved());
        assert!(!pr_with_votes(&[10, 0]).is_approved());
        assert!(!pr_with_votes(&[]).is_approved());
        assert!(pr_with_votes(&[10, -10]).has_rejections());
    }

    #[test]
    fn test_pull_request_display_helpers() {
        let mut pr = pr_with_votes(&[]);
        assert_eq!(pr.branch_summary(), "feature/cache -> main");
        assert_eq!(pr.status_display(), "active");

        pr.merge_status = Some("conflicts".to_string());
        assert_eq!(pr.status_display(), "conflicts");

        pr.is_draft = true;
        assert_eq!(pr.status_display(), "draft");
    }

    #[test]
    fn test_list_response_envelope() {
        let json = r#"{"count": 1, "value": [{"id": 9, "status": "inProgress"}]}"#;
        let response: ListResponse<Build> = serde_json::from_str(json).unwrap();
        assert_eq!(response.count, 1);
        assert!(response.value[0].is_running());
    }
}
