use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};

use crate::collect::{CollectOptions, Include};
use crate::pipeline::RunConfig;
use crate::source::github::parse_repo_slug;
use crate::util;
use crate::window::TimeWindow;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
  Commits,
  Prs,
  Issues,
}

#[derive(Parser, Debug)]
#[command(
    name = "repo-activity",
    version,
    about = "Collect GitHub repository activity (commits, PRs, issues) with analytics as JSON",
    long_about = None
)]
pub struct Cli {
  /// Repository as owner/repo or a GitHub URL
  #[arg(required_unless_present = "gen_man")]
  pub repo: Option<String>,

  /// Window start: YYYY-MM-DD, RFC 3339, or a phrase like "6 months ago" (default: one year ago)
  #[arg(long)]
  pub since: Option<String>,

  /// Window end, same formats as --since (default: now)
  #[arg(long)]
  pub until: Option<String>,

  /// Resources to collect
  #[arg(
    long,
    value_enum,
    value_delimiter = ',',
    default_values_t = vec![Resource::Commits, Resource::Prs, Resource::Issues]
  )]
  pub include: Vec<Resource>,

  /// Output file for the JSON document ("-" for stdout)
  #[arg(long, short, default_value = "-")]
  pub out: String,

  /// GitHub token (default: GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
  #[arg(long)]
  pub token: Option<String>,

  /// IANA time zone used for day/week/month buckets
  #[arg(long, default_value = "UTC")]
  pub tz: String,

  /// Maximum concurrent review fetches
  #[arg(long, default_value_t = 4)]
  pub review_concurrency: usize,

  /// Abort the whole run after this many seconds
  #[arg(long)]
  pub timeout: Option<u64>,

  /// Log progress to stderr
  #[arg(long, short)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub owner: String,
  pub name: String,
  pub window: TimeWindow,
  pub include: Include,
  pub out: String,
  pub token: Option<String>,
  pub tz: Tz,
  pub review_concurrency: usize,
  pub timeout: Option<Duration>,
  pub verbose: bool,
  pub now: DateTime<Utc>,
}

impl EffectiveConfig {
  pub fn slug(&self) -> String {
    format!("{}/{}", self.owner, self.name)
  }

  pub fn run_config(&self) -> RunConfig {
    let mut run = RunConfig::new(self.slug(), self.window, self.now);
    run.include = self.include;
    run.tz = self.tz;
    run.options = CollectOptions {
      review_concurrency: self.review_concurrency,
      ..CollectOptions::default()
    };
    run
  }
}

fn include_set(resources: &[Resource]) -> Result<Include> {
  if resources.is_empty() {
    bail!("--include needs at least one of: commits, prs, issues");
  }

  Ok(Include {
    commits: resources.contains(&Resource::Commits),
    pull_requests: resources.contains(&Resource::Prs),
    issues: resources.contains(&Resource::Issues),
  })
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let repo = cli.repo.as_deref().ok_or_else(|| anyhow!("Repository is required (owner/repo)"))?;
  let (owner, name) =
    parse_repo_slug(repo).ok_or_else(|| anyhow!("Invalid repository format {:?}. Use: owner/repo", repo))?;

  let now = util::effective_now(util::parse_now_override(cli.now_override.as_deref())?);
  let window = TimeWindow::resolve(cli.since.as_deref(), cli.until.as_deref(), now)?;

  let tz: Tz = cli
    .tz
    .parse()
    .map_err(|_| anyhow!("Unknown time zone {:?}; use an IANA name such as Europe/Berlin", cli.tz))?;

  if cli.review_concurrency == 0 {
    bail!("--review-concurrency must be at least 1");
  }

  Ok(EffectiveConfig {
    owner,
    name,
    window,
    include: include_set(&cli.include)?,
    out: cli.out,
    token: cli.token.filter(|t| !t.trim().is_empty()),
    tz,
    review_concurrency: cli.review_concurrency,
    timeout: cli.timeout.map(Duration::from_secs),
    verbose: cli.verbose,
    now,
  })
}
