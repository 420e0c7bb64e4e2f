// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Trait seam between the collectors and the transport that actually talks to the activity API
// role: source/seam
// outputs: ActivitySource trait, ResourceKind, PageQuery and Page types; backend selection
// invariants:
// - fetch_page returns records in the order requested by the query (sort + direction)
// - fetch_reviews failures are independent per pull request
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SourceError;

pub mod env;
pub mod github;

/// A raw record as returned by the source, before normalization.
pub type RawRecord = serde_json::Value;

/// Page size used for every paginated listing.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
  Commits,
  PullRequests,
  Issues,
  /// Metadata lookup only; never paginated.
  Repository,
}

impl std::fmt::Display for ResourceKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      ResourceKind::Commits => "commits",
      ResourceKind::PullRequests => "pull requests",
      ResourceKind::Issues => "issues",
      ResourceKind::Repository => "repository",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateFilter {
  Open,
  Closed,
  All,
}

impl StateFilter {
  pub fn as_str(&self) -> &'static str {
    match self {
      StateFilter::Open => "open",
      StateFilter::Closed => "closed",
      StateFilter::All => "all",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  Created,
  Updated,
}

impl SortKey {
  pub fn as_str(&self) -> &'static str {
    match self {
      SortKey::Created => "created",
      SortKey::Updated => "updated",
    }
  }
}

/// Filter parameters for one paginated listing; always descending when `sort` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
  pub state: Option<StateFilter>,
  pub sort: Option<SortKey>,
  pub since: Option<DateTime<Utc>>,
  pub until: Option<DateTime<Utc>>,
}

impl PageQuery {
  pub fn bounded(since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
    Self {
      since: Some(since),
      until: Some(until),
      ..Self::default()
    }
  }

  pub fn sorted(state: StateFilter, sort: SortKey) -> Self {
    Self {
      state: Some(state),
      sort: Some(sort),
      ..Self::default()
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
  pub records: Vec<RawRecord>,
  /// Set when the source knows there is nothing after this page.
  pub exhausted: bool,
}

impl Page {
  pub fn new(records: Vec<RawRecord>, per_page: u32) -> Self {
    let exhausted = records.len() < per_page as usize;
    Self { records, exhausted }
  }
}

/// Capability the collectors need from the transport.
///
/// Implementations must be shareable across threads: resources are collected
/// concurrently and review fetches fan out over a worker pool.
pub trait ActivitySource: Send + Sync {
  /// Fetch one page (1-based) of `kind` matching `query`.
  fn fetch_page(&self, kind: ResourceKind, query: &PageQuery, page: u32, per_page: u32) -> Result<Page, SourceError>;

  /// Fetch the reviews submitted on one pull request.
  fn fetch_reviews(&self, number: u64) -> Result<Vec<RawRecord>, SourceError>;

  /// Raw repository metadata, when the backend can provide it.
  fn fetch_repository(&self) -> Result<Option<RawRecord>, SourceError> {
    Ok(None)
  }
}

impl<T: ActivitySource + ?Sized> ActivitySource for Box<T> {
  fn fetch_page(&self, kind: ResourceKind, query: &PageQuery, page: u32, per_page: u32) -> Result<Page, SourceError> {
    (**self).fetch_page(kind, query, page, per_page)
  }

  fn fetch_reviews(&self, number: u64) -> Result<Vec<RawRecord>, SourceError> {
    (**self).fetch_reviews(number)
  }

  fn fetch_repository(&self) -> Result<Option<RawRecord>, SourceError> {
    (**self).fetch_repository()
  }
}

/// Pick the backend: env fixtures when present, otherwise the GitHub HTTP API.
///
/// Token discovery only runs for the HTTP backend.
pub fn build_source(owner: &str, name: &str, token: Option<String>) -> Box<dyn ActivitySource> {
  if env::env_wants_mock() {
    debug!("using env fixture source");
    return Box::new(env::EnvSource::new());
  }

  let token = token.or_else(github::get_github_token);
  if token.is_none() {
    warn!("no GitHub token found; unauthenticated requests are heavily rate limited");
  }

  Box::new(github::GithubSource::new(owner, name, token))
}
