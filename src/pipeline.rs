// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: One collection run end to end: metadata, windowed collection, aggregation, contributor roll-up
// role: orchestration/pipeline
// inputs: ActivitySource, RunConfig, CancelToken
// outputs: RepositoryData
// side_effects: Calls the source (through the collectors)
// invariants:
// - Metadata access errors (401/403/404) fail the run before any activity page is requested
// - Aggregation only ever sees a fully collected set; any collection error discards the run
// errors: CollectError
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::analytics::{self, AnalyzeOptions};
use crate::collect::{self, CancelToken, CollectOptions, Include};
use crate::error::{CollectError, Result, SourceError};
use crate::model::{RepositoryData, RepositoryInfo, RepositoryMetadata, TimeRange};
use crate::normalize;
use crate::source::{ActivitySource, ResourceKind};
use crate::window::TimeWindow;

#[derive(Debug, Clone)]
pub struct RunConfig {
  /// `owner/name`, used as the document's repository name.
  pub repository: String,
  pub window: TimeWindow,
  pub include: Include,
  pub options: CollectOptions,
  pub tz: Tz,
  /// Collection instant recorded in the document and used for activity recency.
  pub now: DateTime<Utc>,
}

impl RunConfig {
  pub fn new(repository: impl Into<String>, window: TimeWindow, now: DateTime<Utc>) -> Self {
    Self {
      repository: repository.into(),
      window,
      include: Include::default(),
      options: CollectOptions::default(),
      tz: Tz::UTC,
      now,
    }
  }
}

fn fetch_metadata<S>(source: &S) -> Result<Option<RepositoryMetadata>>
where
  S: ActivitySource + ?Sized,
{
  match source.fetch_repository() {
    Ok(raw) => Ok(raw.map(|r| normalize::metadata(&r))),
    Err(e @ (SourceError::Transport(_) | SourceError::Decode(_))) => {
      warn!("repository metadata unavailable: {}", e);
      Ok(None)
    }
    Err(e) => Err(CollectError::from_source(ResourceKind::Repository, 0, e)),
  }
}

pub fn run<S>(source: &S, config: &RunConfig, cancel: &CancelToken) -> Result<RepositoryData>
where
  S: ActivitySource + ?Sized,
{
  cancel.check()?;

  info!(
    repository = %config.repository,
    since = %config.window.since(),
    until = %config.window.until(),
    "collecting activity"
  );

  let metadata = fetch_metadata(source)?;
  let collected = collect::collect_all(source, &config.window, config.include, &config.options, cancel)?;

  let analytics = analytics::analyze(
    &collected.commits,
    &collected.pull_requests,
    &collected.issues,
    &AnalyzeOptions::new(config.now).with_tz(config.tz),
  );
  let contributors = analytics::rollup(&collected.commits, &collected.pull_requests, &collected.issues);

  Ok(RepositoryData {
    repository: RepositoryInfo {
      name: config.repository.clone(),
      metadata,
      collection_date: config.now,
      time_range: TimeRange {
        start: config.window.since(),
        end: config.window.until(),
      },
    },
    commits: collected.commits,
    pull_requests: collected.pull_requests,
    issues: collected.issues,
    contributors,
    analytics,
    warnings: collected.warnings,
  })
}
