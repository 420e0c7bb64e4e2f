// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive windowed collection of commits, pull requests and issues from an ActivitySource
// role: collection/orchestration
// inputs: ActivitySource, TimeWindow, Include set, CollectOptions, CancelToken
// outputs: Collected { commits, pull_requests, issues, warnings } sorted ascending by time
// side_effects: Calls the source; sleeps between requests to respect rate limits
// invariants:
// - Every returned record's governing timestamp lies inside the window
// - Listing calls for one resource start at least page_delay apart; review calls at least review_delay apart
// - Cancellation or any fatal page failure discards everything collected so far
// errors: CollectError; per-PR review failures are downgraded to CollectWarning
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::info;

use crate::error::{CollectError, CollectWarning, Result};
use crate::model::{Commit, Issue, PullRequest};
use crate::source::{ActivitySource, PAGE_SIZE};
use crate::window::TimeWindow;

pub mod commits;
pub mod issues;
pub mod paginate;
pub mod pull_requests;

pub use commits::collect_commits;
pub use issues::collect_issues;
pub use paginate::{PageState, Step};
pub use pull_requests::collect_pull_requests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
  pub page_size: u32,
  /// Minimum spacing between successive page requests of one resource.
  pub page_delay: Duration,
  /// Minimum spacing between successive review requests.
  pub review_delay: Duration,
  /// Upper bound on in-flight review fetches.
  pub review_concurrency: usize,
}

impl Default for CollectOptions {
  fn default() -> Self {
    Self {
      page_size: PAGE_SIZE,
      page_delay: Duration::from_millis(100),
      review_delay: Duration::from_millis(50),
      review_concurrency: 4,
    }
  }
}

/// Which resources a run collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Include {
  pub commits: bool,
  pub pull_requests: bool,
  pub issues: bool,
}

impl Default for Include {
  fn default() -> Self {
    Self {
      commits: true,
      pull_requests: true,
      issues: true,
    }
  }
}

/// Shared cancellation signal, optionally with a deadline.
///
/// Clones observe the same flag. Collectors poll it before every request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
  flag: Arc<AtomicBool>,
  deadline: Option<Instant>,
  parent: Option<Arc<CancelToken>>,
}

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_timeout(timeout: Duration) -> Self {
    Self {
      deadline: Instant::now().checked_add(timeout),
      ..Self::default()
    }
  }

  /// A token that trips with this one but can also be cancelled on its own.
  pub fn child(&self) -> Self {
    Self {
      parent: Some(Arc::new(self.clone())),
      ..Self::default()
    }
  }

  pub fn cancel(&self) {
    self.flag.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.flag.load(Ordering::SeqCst)
      || self.deadline.is_some_and(|d| Instant::now() >= d)
      || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
  }

  pub fn check(&self) -> Result<()> {
    if self.is_cancelled() {
      Err(CollectError::Cancelled)
    } else {
      Ok(())
    }
  }
}

/// Spaces request starts at least `interval` apart, across threads.
#[derive(Debug)]
pub struct Throttle {
  interval: Duration,
  next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
  pub fn new(interval: Duration) -> Self {
    Self {
      interval,
      next_slot: Mutex::new(None),
    }
  }

  /// Block until the caller's reserved slot. The first caller never waits.
  pub fn wait(&self) {
    if self.interval.is_zero() {
      return;
    }

    let slot = {
      let mut next = self.next_slot.lock().unwrap_or_else(PoisonError::into_inner);
      let now = Instant::now();
      let slot = match *next {
        Some(t) if t > now => t,
        _ => now,
      };
      *next = Some(slot + self.interval);
      slot
    };

    let now = Instant::now();
    if slot > now {
      std::thread::sleep(slot - now);
    }
  }
}

/// Borrowed run parameters handed to each collector.
#[derive(Debug, Clone, Copy)]
pub struct CollectContext<'a> {
  pub window: &'a TimeWindow,
  pub options: &'a CollectOptions,
  pub cancel: &'a CancelToken,
}

impl<'a> CollectContext<'a> {
  pub fn new(window: &'a TimeWindow, options: &'a CollectOptions, cancel: &'a CancelToken) -> Self {
    Self { window, options, cancel }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
  pub commits: Vec<Commit>,
  pub pull_requests: Vec<PullRequest>,
  pub issues: Vec<Issue>,
  pub warnings: Vec<CollectWarning>,
}

/// Collect every included resource concurrently.
///
/// Resources are independent; if any of them fails the whole run fails and
/// nothing partial is returned.
pub fn collect_all<S>(
  source: &S,
  window: &TimeWindow,
  include: Include,
  options: &CollectOptions,
  cancel: &CancelToken,
) -> Result<Collected>
where
  S: ActivitySource + ?Sized,
{
  cancel.check()?;
  // Siblings stop at their next request once any resource fails.
  let run = cancel.child();
  let ctx = CollectContext::new(window, options, &run);
  let abort = |e: CollectError| {
    run.cancel();
    e
  };

  let (commits, (pulls, issues)) = rayon::join(
    || {
      if include.commits {
        collect_commits(source, &ctx).map_err(abort)
      } else {
        Ok(Vec::new())
      }
    },
    || {
      rayon::join(
        || {
          if include.pull_requests {
            collect_pull_requests(source, &ctx).map_err(abort)
          } else {
            Ok((Vec::new(), Vec::new()))
          }
        },
        || {
          if include.issues {
            collect_issues(source, &ctx).map_err(abort)
          } else {
            Ok(Vec::new())
          }
        },
      )
    },
  );

  let (commits, (pull_requests, warnings), issues) = match (commits, pulls, issues) {
    (Ok(c), Ok(p), Ok(i)) => (c, p, i),
    (c, p, i) => return Err(first_fatal([c.err(), p.err(), i.err()])),
  };

  // A cancel that lands after the last request still discards the run.
  cancel.check()?;

  info!(
    commits = commits.len(),
    pull_requests = pull_requests.len(),
    issues = issues.len(),
    warnings = warnings.len(),
    "collection complete"
  );

  Ok(Collected {
    commits,
    pull_requests,
    issues,
    warnings,
  })
}

/// The error that stopped the run, preferring a real failure over the
/// cancellations it caused in sibling collectors.
fn first_fatal(errors: [Option<CollectError>; 3]) -> CollectError {
  let mut fallback = CollectError::Cancelled;
  for err in errors.into_iter().flatten() {
    if matches!(err, CollectError::Cancelled) {
      fallback = err;
    } else {
      return err;
    }
  }
  fallback
}
