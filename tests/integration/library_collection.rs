use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use serial_test::serial;

use repo_activity::collect::{collect_all, CancelToken, CollectOptions, Include};
use repo_activity::source::env::EnvSource;
use repo_activity::source::{ActivitySource, Page, PageQuery, ResourceKind, StateFilter};
use repo_activity::window::TimeWindow;
use repo_activity::{CollectError, RunConfig, SourceError};

fn window() -> TimeWindow {
  TimeWindow::new(
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
  )
  .unwrap()
}

fn fast(page_size: u32) -> CollectOptions {
  CollectOptions {
    page_size,
    page_delay: Duration::ZERO,
    review_delay: Duration::ZERO,
    review_concurrency: 2,
  }
}

/// An endless issues feed, newest first, one item per day going backwards.
struct EndlessIssues {
  requested: Mutex<Vec<u32>>,
}

impl ActivitySource for EndlessIssues {
  fn fetch_page(&self, kind: ResourceKind, _: &PageQuery, page: u32, per_page: u32) -> Result<Page, SourceError> {
    if kind != ResourceKind::Issues {
      return Ok(Page::default());
    }

    self.requested.lock().unwrap().push(page);
    let start = Utc.with_ymd_and_hms(2024, 1, 9, 12, 0, 0).unwrap();
    let records: Vec<Value> = (0..per_page)
      .map(|i| {
        let at = start - chrono::Duration::days(((page - 1) * per_page + i) as i64);
        json!({
          "number": (page - 1) * per_page + i + 1,
          "state": "open",
          "user": { "login": "walker" },
          "created_at": at.to_rfc3339(),
          "updated_at": at.to_rfc3339()
        })
      })
      .collect();

    Ok(Page::new(records, per_page))
  }

  fn fetch_reviews(&self, _: u64) -> Result<Vec<Value>, SourceError> {
    Ok(Vec::new())
  }
}

#[test]
fn endless_feed_stops_at_window_boundary() {
  let source = EndlessIssues {
    requested: Mutex::new(Vec::new()),
  };
  let out = collect_all(&source, &window(), Include::default(), &fast(3), &CancelToken::new()).unwrap();

  // Nine in-window days (Jan 9 back to Jan 1); the item for Dec 31 sits on page 4.
  assert_eq!(out.issues.len(), 9);
  assert_eq!(*source.requested.lock().unwrap(), vec![1, 2, 3, 4]);
  assert!(out.issues.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[test]
fn cancelled_token_discards_everything() {
  let source = EndlessIssues {
    requested: Mutex::new(Vec::new()),
  };
  let cancel = CancelToken::new();
  cancel.cancel();
  let err = collect_all(&source, &window(), Include::default(), &fast(3), &cancel).unwrap_err();
  assert!(matches!(err, CollectError::Cancelled));
  assert!(source.requested.lock().unwrap().is_empty());
}

#[test]
#[serial]
fn env_source_drives_the_pipeline() {
  let vars: Vec<(&str, String)> = test_support::fixture_env();
  let pairs: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (*k, v.as_str())).collect();
  let _env = test_support::with_env(&pairs);

  let mut config = RunConfig::new("octo/demo", window(), Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
  config.options = fast(100);

  let data = repo_activity::run(&EnvSource::new(), &config, &CancelToken::new()).unwrap();
  assert_eq!(data.commits.len(), 3);
  assert_eq!(data.pull_requests.len(), 2);
  assert_eq!(data.issues.len(), 1);
  assert_eq!(data.warnings.len(), 1);
  assert_eq!(data.repository.metadata.as_ref().map(|m| m.forks), Some(5));

  let open = EnvSource::new()
    .fetch_page(
      ResourceKind::PullRequests,
      &PageQuery {
        state: Some(StateFilter::Open),
        ..PageQuery::default()
      },
      1,
      100,
    )
    .unwrap();
  assert_eq!(open.records.len(), 1);
}
