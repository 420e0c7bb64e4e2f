//! Pull request collection.
//!
//! Two passes over the listing: closed PRs sorted by update time (a closed PR
//! can be created in-window yet updated long after), then open PRs sorted by
//! creation time. Reviews are then fetched for every kept PR on a bounded
//! worker pool; a failed review fetch only costs that PR its reviews.

use rayon::prelude::*;
use tracing::{info, warn};

use super::paginate::{paginate, Step};
use super::{CollectContext, Throttle};
use crate::error::{CollectError, CollectWarning, Result};
use crate::model::{PullRequest, Review};
use crate::normalize;
use crate::source::{ActivitySource, PageQuery, RawRecord, ResourceKind, SortKey, StateFilter};
use crate::window::TimeWindow;

/// Closed pass: stop once a PR was last updated before the window opened.
pub fn closed_is_past_window(window: &TimeWindow, raw: &RawRecord) -> bool {
  normalize::updated_at(raw).is_some_and(|t| window.precedes(t))
}

/// Open pass: stop once a PR was created before the window opened.
pub fn open_is_past_window(window: &TimeWindow, raw: &RawRecord) -> bool {
  normalize::created_at(raw).is_some_and(|t| window.precedes(t))
}

pub fn classify_closed(window: &TimeWindow, raw: &RawRecord) -> Step<PullRequest> {
  if closed_is_past_window(window, raw) {
    return Step::PastWindow;
  }

  keep_if_created_in_window(window, raw)
}

pub fn classify_open(window: &TimeWindow, raw: &RawRecord) -> Step<PullRequest> {
  if open_is_past_window(window, raw) {
    return Step::PastWindow;
  }

  keep_if_created_in_window(window, raw)
}

fn keep_if_created_in_window(window: &TimeWindow, raw: &RawRecord) -> Step<PullRequest> {
  match normalize::pull_request(raw) {
    Some(pr) if window.contains(pr.created_at) => Step::Keep(pr),
    _ => Step::Skip,
  }
}

enum ReviewOutcome {
  Fetched(Vec<Review>),
  Failed(String),
  Cancelled,
}

fn fetch_reviews_for<S>(source: &S, number: u64, ctx: &CollectContext<'_>, throttle: &Throttle) -> ReviewOutcome
where
  S: ActivitySource + ?Sized,
{
  if ctx.cancel.is_cancelled() {
    return ReviewOutcome::Cancelled;
  }

  throttle.wait();

  match source.fetch_reviews(number) {
    Ok(raw) => ReviewOutcome::Fetched(normalize::reviews(&raw)),
    Err(e) => ReviewOutcome::Failed(e.to_string()),
  }
}

/// Fill `reviews` on every PR created inside the window.
///
/// Returns one warning per PR whose reviews could not be fetched.
pub fn attach_reviews<S>(
  source: &S,
  pull_requests: &mut [PullRequest],
  ctx: &CollectContext<'_>,
) -> Result<Vec<CollectWarning>>
where
  S: ActivitySource + ?Sized,
{
  let targets: Vec<usize> = pull_requests
    .iter()
    .enumerate()
    .filter(|(_, pr)| ctx.window.contains(pr.created_at))
    .map(|(idx, _)| idx)
    .collect();

  if targets.is_empty() {
    return Ok(Vec::new());
  }

  info!(count = targets.len(), "fetching review data for PRs in time range");

  let numbers: Vec<u64> = targets.iter().map(|&idx| pull_requests[idx].number).collect();
  let throttle = Throttle::new(ctx.options.review_delay);
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(ctx.options.review_concurrency.max(1))
    .build()?;

  let outcomes: Vec<ReviewOutcome> = pool.install(|| {
    numbers
      .par_iter()
      .map(|&number| fetch_reviews_for(source, number, ctx, &throttle))
      .collect()
  });

  let mut warnings = Vec::new();

  for (idx, outcome) in targets.into_iter().zip(outcomes) {
    let pr = &mut pull_requests[idx];

    match outcome {
      ReviewOutcome::Fetched(reviews) => pr.reviews = reviews,
      ReviewOutcome::Failed(message) => {
        warn!(number = pr.number, %message, "could not fetch reviews");
        pr.reviews = Vec::new();
        warnings.push(CollectWarning::ReviewFetchFailed {
          number: pr.number,
          message,
        });
      }
      ReviewOutcome::Cancelled => return Err(CollectError::Cancelled),
    }
  }

  Ok(warnings)
}

pub fn collect_pull_requests<S>(source: &S, ctx: &CollectContext<'_>) -> Result<(Vec<PullRequest>, Vec<CollectWarning>)>
where
  S: ActivitySource + ?Sized,
{
  let window = ctx.window;

  let closed_query = PageQuery::sorted(StateFilter::Closed, SortKey::Updated);
  let (closed, closed_state) = paginate(source, ResourceKind::PullRequests, &closed_query, ctx, |raw| {
    classify_closed(window, raw)
  })?;

  let open_query = PageQuery::sorted(StateFilter::Open, SortKey::Created);
  let (open, open_state) = paginate(source, ResourceKind::PullRequests, &open_query, ctx, |raw| {
    classify_open(window, raw)
  })?;

  info!(closed = closed.len(), ?closed_state, open = open.len(), ?open_state, "collected pull requests");

  let mut pull_requests = closed;
  pull_requests.extend(open);

  let warnings = attach_reviews(source, &mut pull_requests, ctx)?;
  pull_requests.sort_by_key(|pr| pr.created_at);

  Ok((pull_requests, warnings))
}
