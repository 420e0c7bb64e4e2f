// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Env-backed ActivitySource serving JSON fixtures so the binary can run end-to-end without network
// role: source/env-fixtures
// inputs: REPO_ACTIVITY_TEST_* environment variables holding JSON
// outputs: Pages sliced from fixture arrays, filtered and sorted like the real listing endpoints
// invariants:
// - Pull request listings honor the state filter and sort descending on the requested key
// - Commit bounds are NOT applied server-side; the collector's client-side filter must do it
// - REPO_ACTIVITY_TEST_FAIL_STATUS makes every call fail with that status
// errors: Malformed fixture JSON surfaces as SourceError::Decode
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde_json::Value;

use super::{ActivitySource, Page, PageQuery, RawRecord, ResourceKind, SortKey, StateFilter};
use crate::error::SourceError;
use crate::ext::serde_json::JsonFetch;

pub const COMMITS_VAR: &str = "REPO_ACTIVITY_TEST_COMMITS_JSON";
pub const PULLS_VAR: &str = "REPO_ACTIVITY_TEST_PULLS_JSON";
pub const ISSUES_VAR: &str = "REPO_ACTIVITY_TEST_ISSUES_JSON";
pub const REVIEWS_VAR: &str = "REPO_ACTIVITY_TEST_REVIEWS_JSON";
pub const REPO_VAR: &str = "REPO_ACTIVITY_TEST_REPO_JSON";
pub const FAIL_STATUS_VAR: &str = "REPO_ACTIVITY_TEST_FAIL_STATUS";

const ALL_VARS: [&str; 6] = [COMMITS_VAR, PULLS_VAR, ISSUES_VAR, REVIEWS_VAR, REPO_VAR, FAIL_STATUS_VAR];

pub fn env_wants_mock() -> bool {
  ALL_VARS.iter().any(|k| std::env::var(k).is_ok())
}

fn read_var(key: &str) -> Result<Option<Value>, SourceError> {
  match std::env::var(key) {
    Ok(s) => serde_json::from_str::<Value>(&s)
      .map(Some)
      .map_err(|e| SourceError::Decode(format!("{}: {}", key, e))),
    Err(_) => Ok(None),
  }
}

fn read_array(key: &str) -> Result<Vec<RawRecord>, SourceError> {
  match read_var(key)? {
    Some(Value::Array(items)) => Ok(items),
    Some(_) => Err(SourceError::Decode(format!("{}: expected a JSON array", key))),
    None => Ok(Vec::new()),
  }
}

fn simulated_failure() -> Option<SourceError> {
  let raw = std::env::var(FAIL_STATUS_VAR).ok()?;

  let err = match raw.trim() {
    "401" => SourceError::Unauthorized,
    "403" => SourceError::Forbidden,
    "404" => SourceError::NotFound,
    other => SourceError::Transport(format!("simulated failure {}", other)),
  };

  Some(err)
}

fn matches_state(record: &Value, state: Option<StateFilter>) -> bool {
  match state {
    None | Some(StateFilter::All) => true,
    Some(filter) => record.fetch("state").to_text().as_deref() == Some(filter.as_str()),
  }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl EnvSource {
  pub fn new() -> Self {
    Self
  }
}

impl ActivitySource for EnvSource {
  fn fetch_page(&self, kind: ResourceKind, query: &PageQuery, page: u32, per_page: u32) -> Result<Page, SourceError> {
    if let Some(err) = simulated_failure() {
      return Err(err);
    }

    let key = match kind {
      ResourceKind::Commits => COMMITS_VAR,
      ResourceKind::PullRequests => PULLS_VAR,
      ResourceKind::Issues => ISSUES_VAR,
      ResourceKind::Repository => {
        return Err(SourceError::Decode("repository metadata is not paginated".into()));
      }
    };

    let mut records: Vec<RawRecord> = read_array(key)?
      .into_iter()
      .filter(|r| matches_state(r, query.state))
      .collect();

    if let Some(sort) = query.sort {
      let field = match sort {
        SortKey::Created => "created_at",
        SortKey::Updated => "updated_at",
      };
      records.sort_by(|a, b| {
        let ka = a.fetch(field).to_or_default::<String>();
        let kb = b.fetch(field).to_or_default::<String>();
        kb.cmp(&ka)
      });
    }

    let per_page = per_page.max(1) as usize;
    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);
    let slice: Vec<RawRecord> = records.into_iter().skip(start).take(per_page).collect();

    Ok(Page::new(slice, per_page as u32))
  }

  fn fetch_reviews(&self, number: u64) -> Result<Vec<RawRecord>, SourceError> {
    if let Some(err) = simulated_failure() {
      return Err(err);
    }

    let Some(map) = read_var(REVIEWS_VAR)? else {
      return Ok(Vec::new());
    };

    match map.get(number.to_string()) {
      Some(Value::Array(items)) => Ok(items.clone()),
      Some(Value::String(msg)) => Err(SourceError::Transport(msg.clone())),
      Some(_) => Err(SourceError::Decode(format!("reviews for #{}: expected an array", number))),
      None => Ok(Vec::new()),
    }
  }

  fn fetch_repository(&self) -> Result<Option<RawRecord>, SourceError> {
    if let Some(err) = simulated_failure() {
      return Err(err);
    }

    read_var(REPO_VAR)
  }
}
