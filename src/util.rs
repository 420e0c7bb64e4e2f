// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Small helpers for deterministic time, elapsed-hour arithmetic and man page rendering
// role: utilities/helpers
// inputs: Optional "now" override strings; DateTime pairs; clap CommandFactory
// outputs: Effective now, whole-hour differences, man page text
// invariants:
// - diff_hours truncates toward zero like a whole-hour stopwatch
// - effective_now never reads the clock when an override is given
// errors: parse_now_override surfaces InvalidTimestamp; man rendering bubbles io errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use clap::CommandFactory;

use crate::error::Result;

/// Returns the effective "now" given an optional override.
///
/// Centralizes test determinism without sprinkling `Utc::now()` throughout the code.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Parse the hidden `--now-override` value, if any.
pub fn parse_now_override(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  match raw {
    Some(s) => {
      let now = Utc::now();
      crate::window::parse_instant(s, now).map(Some)
    }
    None => Ok(None),
  }
}

/// Whole hours from `start` to `end`, truncated toward zero.
pub fn diff_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
  (end - start).num_hours()
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
