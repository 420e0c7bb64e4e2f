use tracing::info;

use super::paginate::{paginate, Step};
use super::CollectContext;
use crate::error::Result;
use crate::model::Commit;
use crate::normalize;
use crate::source::{ActivitySource, PageQuery, RawRecord, ResourceKind};
use crate::window::TimeWindow;

/// The commits listing is bounded server-side, so there is no early stop;
/// the window is re-checked here in case the backend ignores the bounds.
pub fn classify(window: &TimeWindow, raw: &RawRecord) -> Step<Commit> {
  match normalize::commit(raw) {
    Some(c) if window.contains(c.timestamp) => Step::Keep(c),
    _ => Step::Skip,
  }
}

pub fn collect_commits<S>(source: &S, ctx: &CollectContext<'_>) -> Result<Vec<Commit>>
where
  S: ActivitySource + ?Sized,
{
  let window = ctx.window;
  let query = PageQuery::bounded(window.since(), window.until());

  let (mut commits, _) = paginate(source, ResourceKind::Commits, &query, ctx, |raw| classify(window, raw))?;
  commits.sort_by_key(|c| c.timestamp);

  info!(count = commits.len(), "collected commits");
  Ok(commits)
}
