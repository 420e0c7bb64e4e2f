// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Pure aggregation of canonical records into an AnalyticsSnapshot and a contributor registry
// role: analytics/aggregation
// inputs: Slices of Commit, PullRequest, Issue; AnalyzeOptions { now, tz }
// outputs: AnalyticsSnapshot; Vec<Contributor>
// invariants:
// - Inputs are never mutated; every output sequence is freshly built
// - Same inputs and options => byte-identical serialized snapshot
// - Frequency bucket counts sum to the number of commits at each granularity
// - Bucket keys are YYYY-MM-DD dates (day, Monday week start, first of month) in the configured zone
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::model::{AnalyticsSnapshot, Commit, Issue, PullRequest};

pub mod contributors;
pub mod frequency;
pub mod issues;
pub mod pull_requests;

pub use contributors::{contributor_patterns, rollup};

/// Trailing span used for `active_contributors`.
pub const ACTIVE_SPAN_DAYS: i64 = 30;
pub const TOP_CONTRIBUTORS: usize = 10;
pub const NEW_CONTRIBUTORS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzeOptions {
  /// Collection instant; anchors the active-contributor span.
  pub now: DateTime<Utc>,
  /// Zone in which bucket keys are computed.
  pub tz: Tz,
}

impl AnalyzeOptions {
  pub fn new(now: DateTime<Utc>) -> Self {
    Self { now, tz: Tz::UTC }
  }

  pub fn with_tz(mut self, tz: Tz) -> Self {
    self.tz = tz;
    self
  }
}

/// Day/week/month bucket keys for one zone.
#[derive(Debug, Clone, Copy)]
pub struct Buckets {
  tz: Tz,
}

impl Buckets {
  pub fn new(tz: Tz) -> Self {
    Self { tz }
  }

  fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&self.tz).date_naive()
  }

  pub fn day(&self, at: DateTime<Utc>) -> String {
    date_key(self.local_date(at))
  }

  /// Monday of the week containing `at`.
  pub fn week(&self, at: DateTime<Utc>) -> String {
    let date = self.local_date(at);
    let offset = i64::from(date.weekday().num_days_from_monday());
    date_key(date - Duration::days(offset))
  }

  pub fn month(&self, at: DateTime<Utc>) -> String {
    let date = self.local_date(at);
    date_key(date.with_day(1).unwrap_or(date))
  }
}

fn date_key(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

/// String-keyed map that remembers first-insertion order.
#[derive(Debug, Clone)]
pub(crate) struct Ordered<V> {
  index: HashMap<String, usize>,
  entries: Vec<(String, V)>,
}

impl<V> Default for Ordered<V> {
  fn default() -> Self {
    Self {
      index: HashMap::new(),
      entries: Vec::new(),
    }
  }
}

impl<V> Ordered<V> {
  pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
    let idx = *self.index.get(key)?;
    Some(&mut self.entries[idx].1)
  }

  /// Insert a new key at the end. Callers check `get_mut` first.
  pub fn push(&mut self, key: &str, value: V) {
    self.index.insert(key.to_string(), self.entries.len());
    self.entries.push((key.to_string(), value));
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(k, _)| k.as_str())
  }

  pub fn into_entries(self) -> Vec<(String, V)> {
    self.entries
  }
}

impl<V: Default> Ordered<V> {
  pub fn slot(&mut self, key: &str) -> &mut V {
    if !self.index.contains_key(key) {
      self.push(key, V::default());
    }

    let idx = self.index[key];
    &mut self.entries[idx].1
  }
}

/// Mean of whole elapsed hours, rounded half-up; `None` when there are no spans.
pub(crate) fn mean_whole_hours<I>(spans: I) -> Option<i64>
where
  I: IntoIterator<Item = (DateTime<Utc>, DateTime<Utc>)>,
{
  let (sum, n) = spans
    .into_iter()
    .fold((0i64, 0u64), |(sum, n), (start, end)| (sum + crate::util::diff_hours(start, end), n + 1));

  if n == 0 {
    return None;
  }

  Some((sum as f64 / n as f64 + 0.5).floor() as i64)
}

/// Compute the full snapshot. Pure: no I/O and no clock reads.
pub fn analyze(
  commits: &[Commit],
  pull_requests: &[PullRequest],
  issues: &[Issue],
  options: &AnalyzeOptions,
) -> AnalyticsSnapshot {
  let buckets = Buckets::new(options.tz);

  AnalyticsSnapshot {
    commit_frequency: frequency::commit_frequency(commits, &buckets),
    pr_metrics: pull_requests::pr_metrics(pull_requests),
    pr_breakdown: pull_requests::pr_breakdown(pull_requests, &buckets),
    issue_metrics: issues::issue_metrics(issues),
    contributor_patterns: contributor_patterns(commits, pull_requests, issues, options.now),
  }
}

#[cfg(test)]
pub(crate) mod fixtures {
  use chrono::{DateTime, TimeZone, Utc};

  use crate::model::{Commit, Issue, IssueState, PrState, PullRequest, Review, ReviewState};

  pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
  }

  pub fn commit(login: &str, when: DateTime<Utc>) -> Commit {
    Commit {
      sha: format!("{}-{}", login, when.timestamp()),
      author_login: login.to_string(),
      author_name: login.to_uppercase(),
      timestamp: when,
      message: String::new(),
      files_changed: 0,
      additions: 0,
      deletions: 0,
    }
  }

  pub fn pr(number: u64, login: &str, created: DateTime<Utc>, merged: Option<DateTime<Utc>>) -> PullRequest {
    PullRequest {
      number,
      title: format!("PR {}", number),
      author_login: login.to_string(),
      created_at: created,
      merged_at: merged,
      closed_at: merged,
      state: PrState::derive(merged, merged),
      reviews: Vec::new(),
      comments_count: 0,
    }
  }

  pub fn review(login: &str, when: Option<DateTime<Utc>>) -> Review {
    Review {
      reviewer_login: login.to_string(),
      state: ReviewState::Approved,
      submitted_at: when,
    }
  }

  pub fn issue(number: u64, login: &str, created: DateTime<Utc>, closed: Option<DateTime<Utc>>) -> Issue {
    Issue {
      number,
      title: format!("Issue {}", number),
      author_login: login.to_string(),
      created_at: created,
      closed_at: closed,
      state: if closed.is_some() { IssueState::Closed } else { IssueState::Open },
      labels: Vec::new(),
      comments_count: 0,
    }
  }
}
