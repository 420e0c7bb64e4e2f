use predicates::prelude::*;
use serde_json::Value;

const WINDOW: [&str; 6] = [
  "--since",
  "2024-01-01",
  "--until",
  "2024-01-10",
  "--now-override",
  "2024-01-10T00:00:00Z",
];

fn run_fixture(extra: &[&str]) -> Value {
  let out = test_support::cmd_bin("repo-activity")
    .envs(test_support::fixture_env())
    .arg("octo/demo")
    .args(WINDOW)
    .args(extra)
    .output()
    .unwrap();
  assert!(out.status.success(), "cli run failed: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn fixture_run_produces_full_document() {
  let v = run_fixture(&[]);

  assert_eq!(v["repository"]["name"], "octo/demo");
  let repo: Value = test_support::read_fixture_json("repo.json");
  let metadata = &v["repository"]["metadata"];
  assert_eq!(metadata["stars"], repo["stargazers_count"]);
  assert_eq!(metadata["forks"], repo["forks_count"]);
  assert_eq!(metadata["description"], repo["description"]);
  assert!(v["repository"]["time_range"]["start"].as_str().unwrap().starts_with("2024-01-01T00:00:00"));
  assert!(v["repository"]["collection_date"].as_str().unwrap().starts_with("2024-01-10T00:00:00"));

  // Out-of-window commit is dropped client-side; the rest come back oldest first.
  let commits = v["commits"].as_array().unwrap();
  let dates: Vec<&str> = commits.iter().map(|c| c["date"].as_str().unwrap()).collect();
  assert_eq!(dates.len(), 3);
  assert!(dates.windows(2).all(|w| w[0] <= w[1]));
  assert_eq!(commits[2]["files_changed"], 2);
  assert_eq!(commits[2]["author_name"], "Alice Example");

  let prs = v["pull_requests"].as_array().unwrap();
  let numbers: Vec<u64> = prs.iter().map(|p| p["number"].as_u64().unwrap()).collect();
  assert_eq!(numbers, vec![7, 8]);
  assert_eq!(prs[0]["state"], "merged");
  assert_eq!(prs[0]["reviews"].as_array().unwrap().len(), 1);
  assert_eq!(prs[0]["reviews"][0]["reviewer"], "alice");
  assert_eq!(prs[1]["state"], "open");
  assert!(prs[1]["reviews"].as_array().unwrap().is_empty());

  // The PR riding in the issues feed never shows up as an issue.
  let issues = v["issues"].as_array().unwrap();
  assert_eq!(issues.len(), 1);
  assert_eq!(issues[0]["number"], 1);
  assert_eq!(issues[0]["labels"], serde_json::json!(["bug", "triage"]));

  let warnings = v["warnings"].as_array().unwrap();
  assert_eq!(warnings.len(), 1);
  assert_eq!(warnings[0]["kind"], "review_fetch_failed");
  assert_eq!(warnings[0]["number"], 8);
}

#[test]
fn fixture_run_analytics_match_records() {
  let v = run_fixture(&[]);
  let a = &v["analytics"];

  let daily = a["commit_frequency"]["daily"].as_array().unwrap();
  assert_eq!(daily.len(), 3);
  assert!(daily.iter().all(|d| d["count"] == 1));

  assert_eq!(a["pr_metrics"]["total"], 2);
  assert_eq!(a["pr_metrics"]["merged"], 1);
  assert_eq!(a["pr_metrics"]["open"], 1);
  assert_eq!(a["pr_metrics"]["average_merge_time_hours"], 24);

  assert_eq!(a["issue_metrics"]["open"], 1);
  assert!(a["issue_metrics"]["average_close_time_hours"].is_null());

  let by_user: Vec<&str> = a["pr_breakdown"]["by_user"]
    .as_array()
    .unwrap()
    .iter()
    .map(|u| u["user"].as_str().unwrap())
    .collect();
  assert_eq!(by_user, vec!["bob", "alice", "carol"]);

  let top = &a["contributor_patterns"]["top_contributors"][0];
  assert_eq!(top["login"], "alice");
  assert_eq!(top["commits"], 4);
  assert!(top.get("contributions").is_none());

  let contributors = v["contributors"].as_array().unwrap();
  let logins: Vec<&str> = contributors.iter().map(|c| c["login"].as_str().unwrap()).collect();
  assert_eq!(logins, vec!["alice", "bob", "carol"]);
  assert_eq!(contributors[0]["commits"], 3);
  assert_eq!(contributors[0]["issues"], 1);
  assert_eq!(contributors[0]["name"], "Alice Example");
  assert!(contributors[0]["first_contribution"].as_str().unwrap().starts_with("2024-01-01T00:00:00"));
}

#[test]
fn include_limits_collected_resources() {
  let v = run_fixture(&["--include", "issues"]);
  assert!(v["commits"].as_array().unwrap().is_empty());
  assert!(v["pull_requests"].as_array().unwrap().is_empty());
  assert_eq!(v["issues"].as_array().unwrap().len(), 1);
  assert!(v.get("warnings").is_none());
}

#[test]
fn out_writes_file_and_summary_goes_to_stderr() {
  let td = test_support::tempdir();
  let target = td.path().join("reports").join("demo.json");

  test_support::cmd_bin("repo-activity")
    .envs(test_support::fixture_env())
    .arg("octo/demo")
    .args(WINDOW)
    .args(["--out", target.to_str().unwrap()])
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("Found: 3 commits, 2 PRs, 1 issues"));

  let v: Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
  assert_eq!(v["repository"]["name"], "octo/demo");
}

#[test]
fn bucket_zone_shifts_day_keys() {
  let v = run_fixture(&["--tz", "America/Los_Angeles", "--include", "commits"]);
  let days: Vec<&str> = v["analytics"]["commit_frequency"]["daily"]
    .as_array()
    .unwrap()
    .iter()
    .map(|d| d["date"].as_str().unwrap())
    .collect();
  // Noon UTC is early morning the same day on the US west coast.
  assert_eq!(days, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);

  let v = run_fixture(&["--tz", "Pacific/Kiritimati", "--include", "commits"]);
  let first = v["analytics"]["commit_frequency"]["daily"][0]["date"].as_str().unwrap().to_string();
  // UTC+14 pushes noon UTC past midnight.
  assert_eq!(first, "2024-01-02");
}
