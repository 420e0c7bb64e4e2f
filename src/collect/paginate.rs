//! Window-aware pagination.
//!
//! A listing is walked page by page, strictly in fetch order. Each record is
//! classified by the caller into a [`Step`]; the first [`Step::PastWindow`]
//! stops the walk, because the feed's sort order guarantees nothing after it
//! can fall inside the window.

use tracing::debug;

use super::CollectContext;
use crate::error::{CollectError, Result};
use crate::source::{ActivitySource, Page, PageQuery, RawRecord, ResourceKind};

/// Per-record verdict produced by a collector's classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
  Keep(T),
  Skip,
  /// This record, and everything after it in the feed, precedes the window.
  PastWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
  Fetching { page: u32 },
  FoundBoundary,
  Exhausted,
}

impl PageState {
  pub fn is_done(&self) -> bool {
    !matches!(self, PageState::Fetching { .. })
  }
}

/// Apply one fetched page to the accumulator and decide the next state.
pub fn fold_page<T, F>(page: u32, fetched: &Page, per_page: u32, classify: &mut F, out: &mut Vec<T>) -> PageState
where
  F: FnMut(&RawRecord) -> Step<T>,
{
  if fetched.records.is_empty() {
    return PageState::Exhausted;
  }

  for record in &fetched.records {
    match classify(record) {
      Step::Keep(item) => out.push(item),
      Step::Skip => {}
      Step::PastWindow => return PageState::FoundBoundary,
    }
  }

  if fetched.exhausted || fetched.records.len() < per_page as usize {
    PageState::Exhausted
  } else {
    PageState::Fetching { page: page + 1 }
  }
}

/// Walk `kind` from page 1 until the feed is exhausted or the window boundary is found.
///
/// Any page failure aborts the walk; partial listings are never returned.
pub fn paginate<S, T, F>(
  source: &S,
  kind: ResourceKind,
  query: &PageQuery,
  ctx: &CollectContext<'_>,
  mut classify: F,
) -> Result<(Vec<T>, PageState)>
where
  S: ActivitySource + ?Sized,
  F: FnMut(&RawRecord) -> Step<T>,
{
  let per_page = ctx.options.page_size.max(1);
  let throttle = super::Throttle::new(ctx.options.page_delay);
  let mut out: Vec<T> = Vec::new();
  let mut state = PageState::Fetching { page: 1 };

  while let PageState::Fetching { page } = state {
    ctx.cancel.check()?;
    throttle.wait();

    let fetched = source
      .fetch_page(kind, query, page, per_page)
      .map_err(|e| CollectError::from_source(kind, page, e))?;

    state = fold_page(page, &fetched, per_page, &mut classify, &mut out);

    debug!(resource = %kind, page, records = fetched.records.len(), kept = out.len(), ?state, "page processed");
  }

  Ok((out, state))
}
