//! Contributor patterns and the per-login roll-up.
//!
//! Both walk commits first, then pull requests, then issues, so first-seen
//! order (and therefore tie-breaking) is the same everywhere.

use chrono::{DateTime, Duration, Utc};

use super::{Ordered, ACTIVE_SPAN_DAYS, NEW_CONTRIBUTORS, TOP_CONTRIBUTORS};
use crate::model::{Commit, Contributor, ContributorCount, ContributorPatterns, Issue, PullRequest};

/// Every authored event as `(login, timestamp)`, in canonical walk order.
fn events<'a>(
  commits: &'a [Commit],
  pull_requests: &'a [PullRequest],
  issues: &'a [Issue],
) -> impl Iterator<Item = (&'a str, DateTime<Utc>)> + 'a {
  commits
    .iter()
    .map(|c| (c.author_login.as_str(), c.timestamp))
    .chain(pull_requests.iter().map(|pr| (pr.author_login.as_str(), pr.created_at)))
    .chain(issues.iter().map(|i| (i.author_login.as_str(), i.created_at)))
}

pub fn contributor_patterns(
  commits: &[Commit],
  pull_requests: &[PullRequest],
  issues: &[Issue],
  now: DateTime<Utc>,
) -> ContributorPatterns {
  let mut counts: Ordered<u64> = Ordered::default();
  let mut active: Ordered<()> = Ordered::default();
  let active_since = now - Duration::days(ACTIVE_SPAN_DAYS);

  for (login, at) in events(commits, pull_requests, issues) {
    *counts.slot(login) += 1;

    if active_since <= at && at <= now {
      active.slot(login);
    }
  }

  // Known simplification: "new" is the first few logins seen, not a true first-ever check.
  let new_contributors: Vec<String> = counts.keys().take(NEW_CONTRIBUTORS).map(str::to_string).collect();

  let mut top: Vec<ContributorCount> = counts
    .into_entries()
    .into_iter()
    .map(|(login, contributions)| ContributorCount { login, contributions })
    .collect();
  top.sort_by(|a, b| b.contributions.cmp(&a.contributions));
  top.truncate(TOP_CONTRIBUTORS);

  ContributorPatterns {
    top_contributors: top,
    new_contributors,
    active_contributors: active.keys().map(str::to_string).collect(),
  }
}

#[derive(Clone, Copy)]
enum Kind {
  Commit,
  PullRequest,
  Issue,
}

fn record(roster: &mut Ordered<Contributor>, login: &str, name: Option<&str>, at: DateTime<Utc>, kind: Kind) {
  if roster.get_mut(login).is_none() {
    roster.push(
      login,
      Contributor {
        login: login.to_string(),
        name: name.map(str::to_string),
        commits: 0,
        pull_requests: 0,
        issues: 0,
        first_contribution: at,
        last_contribution: at,
      },
    );
  }

  let Some(entry) = roster.get_mut(login) else {
    return;
  };

  entry.first_contribution = entry.first_contribution.min(at);
  entry.last_contribution = entry.last_contribution.max(at);

  match kind {
    Kind::Commit => entry.commits += 1,
    Kind::PullRequest => entry.pull_requests += 1,
    Kind::Issue => entry.issues += 1,
  }
}

/// Fold all three record kinds into one entry per login, in first-seen order.
pub fn rollup(commits: &[Commit], pull_requests: &[PullRequest], issues: &[Issue]) -> Vec<Contributor> {
  let mut roster: Ordered<Contributor> = Ordered::default();

  for c in commits {
    record(&mut roster, &c.author_login, Some(&c.author_name), c.timestamp, Kind::Commit);
  }
  for pr in pull_requests {
    record(&mut roster, &pr.author_login, None, pr.created_at, Kind::PullRequest);
  }
  for i in issues {
    record(&mut roster, &i.author_login, None, i.created_at, Kind::Issue);
  }

  roster.into_entries().into_iter().map(|(_, c)| c).collect()
}
