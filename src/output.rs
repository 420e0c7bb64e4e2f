use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::RepositoryData;

/// One-line human summary of a collected document.
pub fn summary(data: &RepositoryData) -> String {
  format!(
    "Found: {} commits, {} PRs, {} issues",
    data.commits.len(),
    data.pull_requests.len(),
    data.issues.len()
  )
}

/// Write the document as pretty JSON to `out` ("-" means stdout).
pub fn write_document(data: &RepositoryData, out: &str) -> Result<()> {
  let json = serde_json::to_string_pretty(data).context("serializing activity document")?;

  if out == "-" {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    writeln!(lock, "{}", json).context("writing to stdout")?;
    return Ok(());
  }

  let path = Path::new(out);

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }

  std::fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{AnalyticsSnapshot, RepositoryInfo, TimeRange};
  use chrono::{TimeZone, Utc};

  fn empty_doc() -> RepositoryData {
    let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    RepositoryData {
      repository: RepositoryInfo {
        name: "octo/demo".into(),
        metadata: None,
        collection_date: t,
        time_range: TimeRange { start: t, end: t },
      },
      commits: Vec::new(),
      pull_requests: Vec::new(),
      issues: Vec::new(),
      contributors: Vec::new(),
      analytics: AnalyticsSnapshot::default(),
      warnings: Vec::new(),
    }
  }

  #[test]
  fn summary_counts_records() {
    assert_eq!(summary(&empty_doc()), "Found: 0 commits, 0 PRs, 0 issues");
  }

  #[test]
  fn writes_file_creating_parent_dirs() {
    let td = tempfile::TempDir::new().unwrap();
    let target = td.path().join("nested").join("out.json");
    write_document(&empty_doc(), &target.to_string_lossy()).unwrap();

    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(v["repository"]["name"], "octo/demo");
    assert!(v.get("warnings").is_none());
    assert!(v["analytics"]["pr_metrics"]["average_merge_time_hours"].is_null());
  }
}
