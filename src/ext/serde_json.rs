// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Nested JSON fetching via dotted paths with typed extraction for raw API records
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper (typed, defaulted, timestamp and count extraction)
// invariants: No panics; missing paths and JSON null yield None; counts default to 0
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  /// Attempt to deserialize the fetched value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.value().and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Deserialize as `T`, returning `T::default()` on failure.
  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Non-empty string, or None for missing/null/blank values.
  pub fn to_text(&self) -> Option<String> {
    self.value().and_then(|v| v.as_str()).filter(|s| !s.trim().is_empty()).map(|s| s.to_string())
  }

  /// RFC 3339 timestamp in UTC; unparseable values are treated as absent.
  pub fn to_time(&self) -> Option<DateTime<Utc>> {
    let raw = self.value()?.as_str()?;
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
  }

  /// Non-negative count; anything else is 0.
  pub fn to_count(&self) -> u64 {
    self.value().and_then(|v| v.as_u64()).unwrap_or(0)
  }

  /// Length of an array value, 0 when missing or not an array.
  pub fn array_len(&self) -> usize {
    self.value().and_then(|v| v.as_array()).map(|a| a.len()).unwrap_or(0)
  }

  /// True when the location exists and is not JSON null.
  pub fn is_present(&self) -> bool {
    self.value().is_some()
  }

  fn value(&self) -> Option<&'a serde_json::Value> {
    self.inner.filter(|v| !v.is_null())
  }
}

/// Extension to fetch nested values via dotted paths like "user.login".
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match cur.get(key) {
        Some(next) => cur = next,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}
