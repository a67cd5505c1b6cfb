use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Filtering follows `RUST_LOG` and defaults to
/// `info`; output goes to stderr so command output on stdout stays parseable.
pub fn init_tracing_subscriber() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
