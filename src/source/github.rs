// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub REST backend for ActivitySource (paged listings, reviews, repository metadata) and token discovery
// role: source/github-http
// inputs: owner/name, optional token (GITHUB_TOKEN, GH_TOKEN, or `gh auth token`)
// outputs: Raw JSON records and pages
// side_effects: Network calls to api.github.com; spawns `gh` subprocess for token discovery
// invariants:
// - 401/403/404 map to Unauthorized/Forbidden/NotFound; everything else is Transport or Decode
// - Listing endpoints always request descending order when a sort key is given
// errors: Returned to the collectors, which attach resource context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use chrono::SecondsFormat;
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ActivitySource, Page, PageQuery, RawRecord, ResourceKind, PAGE_SIZE};
use crate::error::SourceError;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "repo-activity";

/// Parse `owner/repo`, or a GitHub https/ssh URL, into `(owner, repo)`.
pub fn parse_repo_slug(input: &str) -> Option<(String, String)> {
  static RE_SLUG: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^(?:git@github\.com:|https?://github\.com/)?([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$")
      .expect("static regex")
  });

  let caps = RE_SLUG.captures(input.trim())?;
  let owner = caps.get(1)?.as_str().to_string();
  let name = caps.get(2)?.as_str().to_string();

  Some((owner, name))
}

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
    if let Ok(t) = std::env::var(var) {
      if !t.trim().is_empty() {
        return Some(t);
      }
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

fn status_error(code: u16) -> SourceError {
  match code {
    401 => SourceError::Unauthorized,
    403 => SourceError::Forbidden,
    404 => SourceError::NotFound,
    other => SourceError::Transport(format!("HTTP {}", other)),
  }
}

fn into_array(v: Value) -> Result<Vec<RawRecord>, SourceError> {
  match v {
    Value::Array(items) => Ok(items),
    other => Err(SourceError::Decode(format!("expected a JSON array, got {}", kind_of(&other)))),
  }
}

fn kind_of(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

pub struct GithubSource {
  owner: String,
  name: String,
  token: Option<String>,
  base_url: String,
  agent: ureq::Agent,
}

impl GithubSource {
  pub fn new(owner: &str, name: &str, token: Option<String>) -> Self {
    Self::with_base_url(owner, name, token, DEFAULT_API_BASE)
  }

  pub fn with_base_url(owner: &str, name: &str, token: Option<String>, base_url: &str) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(Duration::from_secs(30)))
      .build()
      .into();

    Self {
      owner: owner.to_string(),
      name: name.to_string(),
      token,
      base_url: base_url.trim_end_matches('/').to_string(),
      agent,
    }
  }

  fn repo_url(&self, tail: &str) -> String {
    format!("{}/repos/{}/{}{}", self.base_url, self.owner, self.name, tail)
  }

  fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, SourceError> {
    let mut req = self
      .agent
      .get(url)
      .header("Accept", "application/vnd.github+json")
      .header("User-Agent", USER_AGENT);

    if let Some(token) = &self.token {
      req = req.header("Authorization", &format!("Bearer {}", token));
    }

    for (key, value) in params {
      req = req.query(*key, value);
    }

    debug!(url, ?params, "GET");

    match req.call() {
      Ok(mut resp) => resp
        .body_mut()
        .read_json::<Value>()
        .map_err(|e| SourceError::Decode(e.to_string())),
      Err(ureq::Error::StatusCode(code)) => Err(status_error(code)),
      Err(e) => Err(SourceError::Transport(e.to_string())),
    }
  }
}

impl ActivitySource for GithubSource {
  fn fetch_page(&self, kind: ResourceKind, query: &PageQuery, page: u32, per_page: u32) -> Result<Page, SourceError> {
    let tail = match kind {
      ResourceKind::Commits => "/commits",
      ResourceKind::PullRequests => "/pulls",
      ResourceKind::Issues => "/issues",
      ResourceKind::Repository => {
        return Err(SourceError::Decode("repository metadata is not paginated".into()));
      }
    };

    let mut params: Vec<(&str, String)> = Vec::new();

    if let Some(state) = query.state {
      params.push(("state", state.as_str().to_string()));
    }

    if let Some(sort) = query.sort {
      params.push(("sort", sort.as_str().to_string()));
      params.push(("direction", "desc".to_string()));
    }

    if let Some(since) = query.since {
      params.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }

    if let Some(until) = query.until {
      params.push(("until", until.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }

    params.push(("per_page", per_page.to_string()));
    params.push(("page", page.to_string()));

    let records = into_array(self.get_json(&self.repo_url(tail), &params)?)?;

    Ok(Page::new(records, per_page))
  }

  fn fetch_reviews(&self, number: u64) -> Result<Vec<RawRecord>, SourceError> {
    let url = self.repo_url(&format!("/pulls/{}/reviews", number));
    into_array(self.get_json(&url, &[("per_page", PAGE_SIZE.to_string())])?)
  }

  fn fetch_repository(&self) -> Result<Option<RawRecord>, SourceError> {
    let mut repo = self.get_json(&self.repo_url(""), &[])?;

    // Languages are decoration; a failure here must not sink the run.
    match self.get_json(&self.repo_url("/languages"), &[]) {
      Ok(languages) => {
        if let Some(obj) = repo.as_object_mut() {
          obj.insert("languages".into(), languages);
        }
      }
      Err(e) => warn!("could not fetch repository languages: {}", e),
    }

    Ok(Some(repo))
  }
}
