use predicates::prelude::*;

#[test]
fn inverted_window_fails_before_network() {
  // No fixtures and no token: reaching the network would hang or fail differently.
  test_support::cmd_bin("repo-activity")
    .args(["octo/demo", "--since", "2024-02-01", "--until", "2024-01-01"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid window"));
}

#[test]
fn malformed_repository_is_rejected() {
  test_support::cmd_bin("repo-activity")
    .args(["just-a-name"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("owner/repo"));
}

#[test]
fn unparseable_bound_is_rejected() {
  test_support::cmd_bin("repo-activity")
    .args(["octo/demo", "--since", "the other day-ish"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid timestamp"));
}

#[test]
fn missing_repository_exits_nonzero_with_resource_message() {
  test_support::cmd_bin("repo-activity")
    .env("REPO_ACTIVITY_TEST_FAIL_STATUS", "404")
    .args(["octo/missing", "--since", "2024-01-01", "--until", "2024-01-10"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("repository: repository not found"));
}

#[test]
fn unauthorized_token_is_fatal() {
  test_support::cmd_bin("repo-activity")
    .env("REPO_ACTIVITY_TEST_FAIL_STATUS", "401")
    .args(["octo/demo", "--since", "2024-01-01", "--until", "2024-01-10"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("token is invalid"));
}

#[test]
fn transport_failure_on_listing_is_fatal() {
  // Metadata failures other than 401/403/404 are tolerated; the first page request is not.
  test_support::cmd_bin("repo-activity")
    .env("REPO_ACTIVITY_TEST_FAIL_STATUS", "502")
    .args(["octo/demo", "--since", "2024-01-01", "--until", "2024-01-10", "--include", "commits"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("commits: page 1 fetch failed"));
}
