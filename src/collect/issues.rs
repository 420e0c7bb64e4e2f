use tracing::info;

use super::paginate::{paginate, Step};
use super::CollectContext;
use crate::error::Result;
use crate::model::Issue;
use crate::normalize;
use crate::source::{ActivitySource, PageQuery, RawRecord, ResourceKind, SortKey, StateFilter};
use crate::window::TimeWindow;

/// The feed is sorted by update time, descending; once an item was last
/// touched before the window opened, nothing after it can be relevant.
pub fn is_past_window(window: &TimeWindow, raw: &RawRecord) -> bool {
  normalize::updated_at(raw).is_some_and(|t| window.precedes(t))
}

pub fn classify(window: &TimeWindow, raw: &RawRecord) -> Step<Issue> {
  // PRs ride along in the issues feed; they are ignored even for the stop rule.
  if normalize::is_pull_request(raw) {
    return Step::Skip;
  }

  if is_past_window(window, raw) {
    return Step::PastWindow;
  }

  match normalize::issue(raw) {
    Some(issue) if window.contains(issue.created_at) => Step::Keep(issue),
    _ => Step::Skip,
  }
}

pub fn collect_issues<S>(source: &S, ctx: &CollectContext<'_>) -> Result<Vec<Issue>>
where
  S: ActivitySource + ?Sized,
{
  let window = ctx.window;
  let query = PageQuery::sorted(StateFilter::All, SortKey::Updated);

  let (mut issues, state) = paginate(source, ResourceKind::Issues, &query, ctx, |raw| classify(window, raw))?;
  issues.sort_by_key(|i| i.created_at);

  info!(count = issues.len(), ?state, "collected issues");
  Ok(issues)
}
