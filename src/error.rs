// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Error taxonomy for window parsing, source access and collection, plus recoverable warnings
// role: errors/types
// outputs: CollectError (fatal), SourceError (transport seam), CollectWarning (recovered)
// invariants:
// - Source status errors always carry the resource they were raised for
// - ReviewFetchFailed is never fatal; it is reported as a CollectWarning
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::ResourceKind;

pub type Result<T> = std::result::Result<T, CollectError>;

/// Errors raised by an `ActivitySource` backend, before resource context is attached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
  #[error("unauthorized (401)")]
  Unauthorized,
  #[error("forbidden or rate limited (403)")]
  Forbidden,
  #[error("not found (404)")]
  NotFound,
  #[error("transport error: {0}")]
  Transport(String),
  #[error("unexpected response shape: {0}")]
  Decode(String),
}

#[derive(Error, Debug)]
pub enum CollectError {
  #[error("invalid window: since {since} is after until {until}")]
  InvalidWindow { since: String, until: String },
  #[error("invalid timestamp: {0:?}")]
  InvalidTimestamp(String),
  #[error("{resource}: GitHub token is invalid or has insufficient permissions")]
  SourceUnauthorized { resource: ResourceKind },
  #[error("{resource}: access forbidden or API rate limit exceeded")]
  SourceForbidden { resource: ResourceKind },
  #[error("{resource}: repository not found or not accessible")]
  SourceNotFound { resource: ResourceKind },
  #[error("{resource}: page {page} fetch failed: {message}")]
  PageFetchFailed { resource: ResourceKind, page: u32, message: String },
  #[error("collection cancelled")]
  Cancelled,
  #[error("review worker pool: {0}")]
  ReviewPool(#[from] rayon::ThreadPoolBuildError),
}

impl CollectError {
  /// Attach resource context to a failed page request.
  pub fn from_source(resource: ResourceKind, page: u32, err: SourceError) -> Self {
    match err {
      SourceError::Unauthorized => CollectError::SourceUnauthorized { resource },
      SourceError::Forbidden => CollectError::SourceForbidden { resource },
      SourceError::NotFound => CollectError::SourceNotFound { resource },
      SourceError::Transport(message) | SourceError::Decode(message) => {
        CollectError::PageFetchFailed { resource, page, message }
      }
    }
  }
}

/// Recovered, non-fatal problems encountered while collecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectWarning {
  ReviewFetchFailed { number: u64, message: String },
}

impl std::fmt::Display for CollectWarning {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      CollectWarning::ReviewFetchFailed { number, message } => {
        write!(f, "could not fetch reviews for PR #{}: {}", number, message)
      }
    }
  }
}
