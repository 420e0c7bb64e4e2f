use super::{mean_whole_hours, Buckets, Ordered};
use crate::model::{PrBreakdown, PrMetrics, PrState, PullRequest, UserPrActivity, WeeklyPrActivity, WeeklyVelocity};

pub fn pr_metrics(pull_requests: &[PullRequest]) -> PrMetrics {
  let count = |state: PrState| pull_requests.iter().filter(|pr| pr.state == state).count() as u64;

  PrMetrics {
    total: pull_requests.len() as u64,
    merged: count(PrState::Merged),
    closed: count(PrState::Closed),
    open: count(PrState::Open),
    average_merge_time_hours: mean_whole_hours(
      pull_requests
        .iter()
        .filter_map(|pr| Some((pr.created_at, pr.merged_at?))),
    ),
  }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tallies {
  created: u64,
  merged: u64,
  reviewed: u64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Flow {
  opened: u64,
  closed: u64,
}

/// Per-user, per-week and velocity views over the same PR set.
pub fn pr_breakdown(pull_requests: &[PullRequest], buckets: &Buckets) -> PrBreakdown {
  let mut users: Ordered<Tallies> = Ordered::default();
  let mut weeks: Ordered<Tallies> = Ordered::default();
  let mut velocity: Ordered<Flow> = Ordered::default();

  for pr in pull_requests {
    let author = users.slot(&pr.author_login);
    author.created += 1;
    if pr.merged_at.is_some() {
      author.merged += 1;
    }

    let created_week = buckets.week(pr.created_at);
    weeks.slot(&created_week).created += 1;
    velocity.slot(&created_week).opened += 1;

    if let Some(merged_at) = pr.merged_at {
      weeks.slot(&buckets.week(merged_at)).merged += 1;
    }

    if let Some(resolved_at) = pr.resolved_at() {
      velocity.slot(&buckets.week(resolved_at)).closed += 1;
    }

    for review in &pr.reviews {
      users.slot(&review.reviewer_login).reviewed += 1;

      if let Some(submitted_at) = review.submitted_at {
        weeks.slot(&buckets.week(submitted_at)).reviewed += 1;
      }
    }
  }

  let mut by_user: Vec<UserPrActivity> = users
    .into_entries()
    .into_iter()
    .map(|(user, t)| UserPrActivity {
      user,
      created: t.created,
      merged: t.merged,
      reviewed: t.reviewed,
    })
    .collect();
  by_user.sort_by(|a, b| b.total().cmp(&a.total()));

  let mut by_week: Vec<WeeklyPrActivity> = weeks
    .into_entries()
    .into_iter()
    .map(|(week, t)| WeeklyPrActivity {
      week,
      created: t.created,
      merged: t.merged,
      reviewed: t.reviewed,
    })
    .collect();
  by_week.sort_by(|a, b| a.week.cmp(&b.week));

  let mut weekly_velocity: Vec<WeeklyVelocity> = velocity
    .into_entries()
    .into_iter()
    .map(|(week, f)| WeeklyVelocity {
      week,
      opened: f.opened,
      closed: f.closed,
      net_change: f.opened as i64 - f.closed as i64,
    })
    .collect();
  weekly_velocity.sort_by(|a, b| a.week.cmp(&b.week));

  PrBreakdown {
    by_user,
    by_week,
    weekly_velocity,
  }
}
