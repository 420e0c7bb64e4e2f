use tracing_subscriber::EnvFilter;

/// Install the global stderr subscriber. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) {
  let fallback = if verbose { "repo_activity=info,warn" } else { "warn" };

  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}
