use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use chrono_english::{parse_duration, Interval};

use crate::error::{CollectError, Result};

/// Default look-back when `--since` is omitted.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Closed `[since, until]` range shared by every collector and the aggregator of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
  since: DateTime<Utc>,
  until: DateTime<Utc>,
}

impl TimeWindow {
  pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self> {
    if since > until {
      return Err(CollectError::InvalidWindow {
        since: since.to_rfc3339(),
        until: until.to_rfc3339(),
      });
    }

    Ok(Self { since, until })
  }

  /// One year back from `now`, ending at `now`.
  pub fn trailing_year(now: DateTime<Utc>) -> Self {
    Self {
      since: now - Duration::days(DEFAULT_LOOKBACK_DAYS),
      until: now,
    }
  }

  /// Build a window from optional user strings, defaulting each missing side.
  pub fn resolve(since: Option<&str>, until: Option<&str>, now: DateTime<Utc>) -> Result<Self> {
    let default = Self::trailing_year(now);

    let since = match since {
      Some(raw) => parse_instant(raw, now)?,
      None => default.since,
    };
    let until = match until {
      Some(raw) => parse_instant(raw, now)?,
      None => default.until,
    };

    Self::new(since, until)
  }

  pub fn since(&self) -> DateTime<Utc> {
    self.since
  }

  pub fn until(&self) -> DateTime<Utc> {
    self.until
  }

  pub fn contains(&self, at: DateTime<Utc>) -> bool {
    self.since <= at && at <= self.until
  }

  /// True when `at` lies strictly before the window start.
  pub fn precedes(&self, at: DateTime<Utc>) -> bool {
    at < self.since
  }
}

/// Parse a window bound.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC), a bare
/// `YYYY-MM-DD` (midnight UTC), `now`, or a relative phrase such as
/// `3 months ago` resolved against `now`.
pub fn parse_instant(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
  let s = raw.trim();

  if s.eq_ignore_ascii_case("now") {
    return Ok(now);
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }

  for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Ok(ndt.and_utc());
    }
  }

  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
      return Ok(ndt.and_utc());
    }
  }

  if let Ok(interval) = parse_duration(&s.to_lowercase()) {
    if let Some(dt) = shift(now, interval) {
      return Ok(dt);
    }
  }

  Err(CollectError::InvalidTimestamp(raw.to_string()))
}

fn shift(now: DateTime<Utc>, interval: Interval) -> Option<DateTime<Utc>> {
  match interval {
    Interval::Seconds(secs) => now.checked_add_signed(Duration::seconds(secs.into())),
    Interval::Days(days) => now.checked_add_signed(Duration::days(days.into())),
    Interval::Months(months) if months < 0 => now.checked_sub_months(Months::new(months.unsigned_abs())),
    Interval::Months(months) => now.checked_add_months(Months::new(months.unsigned_abs())),
  }
}
