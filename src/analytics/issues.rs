use super::mean_whole_hours;
use crate::model::{Issue, IssueMetrics, IssueState};

pub fn issue_metrics(issues: &[Issue]) -> IssueMetrics {
  let count = |state: IssueState| issues.iter().filter(|i| i.state == state).count() as u64;

  IssueMetrics {
    total: issues.len() as u64,
    open: count(IssueState::Open),
    closed: count(IssueState::Closed),
    average_close_time_hours: mean_whole_hours(issues.iter().filter_map(|i| Some((i.created_at, i.closed_at?)))),
  }
}
