// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Canonical activity records, contributor registry and analytics snapshot shared by collectors, aggregation and output
// role: model/types
// outputs: Serializable structs with stable snake_case field names consumed by presentation tooling
// invariants: PR state is derived from merged_at/closed_at only; timestamps serialize as RFC 3339 UTC
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CollectWarning;

/// Login substituted when the source omits an author identity.
pub const UNKNOWN_LOGIN: &str = "unknown";
/// Display name substituted when a commit omits its author name.
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
  pub sha: String,
  #[serde(rename = "author")]
  pub author_login: String,
  pub author_name: String,
  #[serde(rename = "date")]
  pub timestamp: DateTime<Utc>,
  pub message: String,
  pub files_changed: u64,
  pub additions: u64,
  pub deletions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
  Open,
  Closed,
  Merged,
}

impl PrState {
  /// `merged` iff merged, else `closed` iff closed, else `open`.
  pub fn derive(merged_at: Option<DateTime<Utc>>, closed_at: Option<DateTime<Utc>>) -> Self {
    match (merged_at, closed_at) {
      (Some(_), _) => PrState::Merged,
      (None, Some(_)) => PrState::Closed,
      (None, None) => PrState::Open,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
  Approved,
  ChangesRequested,
  Commented,
}

impl ReviewState {
  pub fn parse(raw: &str) -> Option<Self> {
    match raw.to_ascii_uppercase().as_str() {
      "APPROVED" => Some(ReviewState::Approved),
      "CHANGES_REQUESTED" => Some(ReviewState::ChangesRequested),
      "COMMENTED" => Some(ReviewState::Commented),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  #[serde(rename = "reviewer")]
  pub reviewer_login: String,
  pub state: ReviewState,
  pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
  pub number: u64,
  pub title: String,
  #[serde(rename = "author")]
  pub author_login: String,
  pub created_at: DateTime<Utc>,
  pub merged_at: Option<DateTime<Utc>>,
  pub closed_at: Option<DateTime<Utc>>,
  pub state: PrState,
  pub reviews: Vec<Review>,
  pub comments_count: u64,
}

impl PullRequest {
  /// When the PR stopped being open: merge time, or close time for unmerged PRs.
  pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
    self.merged_at.or(self.closed_at)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
  Open,
  Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
  pub number: u64,
  pub title: String,
  #[serde(rename = "author")]
  pub author_login: String,
  pub created_at: DateTime<Utc>,
  pub closed_at: Option<DateTime<Utc>>,
  pub state: IssueState,
  pub labels: Vec<String>,
  pub comments_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
  pub login: String,
  pub name: Option<String>,
  pub commits: u64,
  pub pull_requests: u64,
  pub issues: u64,
  pub first_contribution: DateTime<Utc>,
  pub last_contribution: DateTime<Utc>,
}

// --- Analytics snapshot ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
  pub date: String,
  pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCount {
  pub week: String,
  pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
  pub month: String,
  pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFrequency {
  pub daily: Vec<DailyCount>,
  pub weekly: Vec<WeeklyCount>,
  pub monthly: Vec<MonthlyCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrMetrics {
  pub total: u64,
  pub merged: u64,
  pub closed: u64,
  pub open: u64,
  pub average_merge_time_hours: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrActivity {
  pub user: String,
  pub created: u64,
  pub merged: u64,
  pub reviewed: u64,
}

impl UserPrActivity {
  pub fn total(&self) -> u64 {
    self.created + self.merged + self.reviewed
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPrActivity {
  pub week: String,
  pub created: u64,
  pub merged: u64,
  pub reviewed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyVelocity {
  pub week: String,
  pub opened: u64,
  pub closed: u64,
  pub net_change: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrBreakdown {
  pub by_user: Vec<UserPrActivity>,
  pub by_week: Vec<WeeklyPrActivity>,
  pub weekly_velocity: Vec<WeeklyVelocity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueMetrics {
  pub total: u64,
  pub open: u64,
  pub closed: u64,
  pub average_close_time_hours: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorCount {
  pub login: String,
  /// Counts every kind of activity; the report key is `commits`, which dashboards read.
  #[serde(rename = "commits")]
  pub contributions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorPatterns {
  pub top_contributors: Vec<ContributorCount>,
  /// First five logins in contribution-count order; not a first-ever-contribution check.
  pub new_contributors: Vec<String>,
  pub active_contributors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
  pub commit_frequency: CommitFrequency,
  pub pr_metrics: PrMetrics,
  pub pr_breakdown: PrBreakdown,
  pub issue_metrics: IssueMetrics,
  pub contributor_patterns: ContributorPatterns,
}

// --- Output document ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
  pub description: Option<String>,
  pub languages: Vec<String>,
  pub created_at: Option<String>,
  pub updated_at: Option<String>,
  pub stars: u64,
  pub forks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub metadata: Option<RepositoryMetadata>,
  pub collection_date: DateTime<Utc>,
  pub time_range: TimeRange,
}

/// Complete activity dataset for one collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryData {
  pub repository: RepositoryInfo,
  pub commits: Vec<Commit>,
  pub pull_requests: Vec<PullRequest>,
  pub issues: Vec<Issue>,
  pub contributors: Vec<Contributor>,
  pub analytics: AnalyticsSnapshot,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub warnings: Vec<CollectWarning>,
}
