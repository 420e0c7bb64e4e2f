use anyhow::{Context, Result};
use clap::Parser;

use repo_activity::cli::{normalize, Cli};
use repo_activity::collect::CancelToken;
use repo_activity::source::build_source;
use repo_activity::{logging, output, pipeline, util};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI (window errors surface here, before any network activity)
  let cfg = normalize(cli)?;
  logging::init(cfg.verbose);

  // Phase 2: pick the backend
  let source = build_source(&cfg.owner, &cfg.name, cfg.token.clone());
  let cancel = match cfg.timeout {
    Some(timeout) => CancelToken::with_timeout(timeout),
    None => CancelToken::new(),
  };

  // Phase 3: collect, aggregate, roll up
  let data = pipeline::run(&source, &cfg.run_config(), &cancel)
    .with_context(|| format!("collecting activity for {}", cfg.slug()))?;

  // Phase 4: emit
  output::write_document(&data, &cfg.out)?;
  eprintln!("{}", output::summary(&data));

  if !data.warnings.is_empty() {
    eprintln!("{} warning(s) recorded in the document", data.warnings.len());
  }

  Ok(())
}
