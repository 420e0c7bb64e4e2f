use super::{Buckets, Ordered};
use crate::model::{Commit, CommitFrequency, DailyCount, MonthlyCount, WeeklyCount};

/// Day, week and month histograms of commit timestamps, in first-seen bucket order.
pub fn commit_frequency(commits: &[Commit], buckets: &Buckets) -> CommitFrequency {
  let mut daily: Ordered<u64> = Ordered::default();
  let mut weekly: Ordered<u64> = Ordered::default();
  let mut monthly: Ordered<u64> = Ordered::default();

  for commit in commits {
    *daily.slot(&buckets.day(commit.timestamp)) += 1;
    *weekly.slot(&buckets.week(commit.timestamp)) += 1;
    *monthly.slot(&buckets.month(commit.timestamp)) += 1;
  }

  CommitFrequency {
    daily: daily
      .into_entries()
      .into_iter()
      .map(|(date, count)| DailyCount { date, count })
      .collect(),
    weekly: weekly
      .into_entries()
      .into_iter()
      .map(|(week, count)| WeeklyCount { week, count })
      .collect(),
    monthly: monthly
      .into_entries()
      .into_iter()
      .map(|(month, count)| MonthlyCount { month, count })
      .collect(),
  }
}
