// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map raw source records into canonical Commit/PullRequest/Review/Issue shapes
// role: normalization
// inputs: serde_json::Value records as returned by an ActivitySource
// outputs: Canonical records with defaults substituted, or None when the governing timestamp is unusable
// invariants:
// - Missing author login => "unknown"; missing commit author name => "Unknown"; missing counts => 0
// - Dismissed reviews and reviews without a user are dropped
// - Labels given as strings or as objects both normalize to their string name
// errors: None; unparseable timestamps are treated as absent
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::ext::serde_json::JsonFetch;
use crate::model::{
  Commit, Issue, IssueState, PrState, PullRequest, RepositoryMetadata, Review, ReviewState, UNKNOWN_LOGIN,
  UNKNOWN_NAME,
};

fn login_or_unknown(raw: &Value, path: &str) -> String {
  raw.fetch(path).to_text().unwrap_or_else(|| UNKNOWN_LOGIN.to_string())
}

/// Update timestamp used by the staleness early-stop rule.
pub fn updated_at(raw: &Value) -> Option<DateTime<Utc>> {
  raw.fetch("updated_at").to_time()
}

pub fn created_at(raw: &Value) -> Option<DateTime<Utc>> {
  raw.fetch("created_at").to_time()
}

/// Issue feeds also carry pull requests; they are marked by a `pull_request` object.
pub fn is_pull_request(raw: &Value) -> bool {
  raw.fetch("pull_request").is_present()
}

pub fn commit(raw: &Value) -> Option<Commit> {
  let timestamp = raw.fetch("commit.author.date").to_time()?;

  Some(Commit {
    sha: raw.fetch("sha").to_or_default::<String>(),
    author_login: login_or_unknown(raw, "author.login"),
    author_name: raw
      .fetch("commit.author.name")
      .to_text()
      .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
    timestamp,
    message: raw.fetch("commit.message").to_or_default::<String>(),
    files_changed: raw.fetch("files").array_len() as u64,
    additions: raw.fetch("stats.additions").to_count(),
    deletions: raw.fetch("stats.deletions").to_count(),
  })
}

pub fn pull_request(raw: &Value) -> Option<PullRequest> {
  let created_at = created_at(raw)?;
  let merged_at = raw.fetch("merged_at").to_time();
  let closed_at = raw.fetch("closed_at").to_time();

  Some(PullRequest {
    number: raw.fetch("number").to_count(),
    title: raw.fetch("title").to_or_default::<String>(),
    author_login: login_or_unknown(raw, "user.login"),
    created_at,
    merged_at,
    closed_at,
    state: PrState::derive(merged_at, closed_at),
    reviews: Vec::new(),
    comments_count: raw.fetch("comments").to_count(),
  })
}

pub fn review(raw: &Value) -> Option<Review> {
  let state_raw = raw.fetch("state").to_or_default::<String>();

  if state_raw.eq_ignore_ascii_case("DISMISSED") {
    return None;
  }

  let reviewer_login = raw.fetch("user.login").to_text()?;
  let state = ReviewState::parse(&state_raw)?;

  Some(Review {
    reviewer_login,
    state,
    submitted_at: raw.fetch("submitted_at").to_time(),
  })
}

pub fn reviews(raw: &[Value]) -> Vec<Review> {
  raw.iter().filter_map(review).collect()
}

pub fn issue(raw: &Value) -> Option<Issue> {
  let created_at = created_at(raw)?;
  let closed_at = raw.fetch("closed_at").to_time();

  let state = match raw.fetch("state").to_text().as_deref() {
    Some("closed") => IssueState::Closed,
    Some("open") => IssueState::Open,
    _ if closed_at.is_some() => IssueState::Closed,
    _ => IssueState::Open,
  };

  Some(Issue {
    number: raw.fetch("number").to_count(),
    title: raw.fetch("title").to_or_default::<String>(),
    author_login: login_or_unknown(raw, "user.login"),
    created_at,
    closed_at,
    state,
    labels: labels(raw),
    comments_count: raw.fetch("comments").to_count(),
  })
}

fn labels(raw: &Value) -> Vec<String> {
  let Some(items) = raw.get("labels").and_then(|l| l.as_array()) else {
    return Vec::new();
  };

  let mut out: Vec<String> = Vec::with_capacity(items.len());

  for item in items {
    let name = match item {
      Value::String(s) => Some(s.clone()),
      other => other.fetch("name").to_text(),
    };

    if let Some(name) = name.filter(|n| !n.is_empty()) {
      if !out.contains(&name) {
        out.push(name);
      }
    }
  }

  out
}

/// Repository metadata; `languages` may be a list of names or the `/languages` byte map.
pub fn metadata(raw: &Value) -> RepositoryMetadata {
  let languages = match raw.get("languages") {
    Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect(),
    Some(Value::Object(map)) => map.keys().cloned().collect(),
    _ => Vec::new(),
  };

  RepositoryMetadata {
    description: raw.fetch("description").to_text(),
    languages,
    created_at: raw.fetch("created_at").to_text(),
    updated_at: raw.fetch("updated_at").to_text(),
    stars: raw.fetch("stargazers_count").to_count(),
    forks: raw.fetch("forks_count").to_count(),
  }
}
