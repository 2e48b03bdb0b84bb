use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG` when set, otherwise from the configured
/// level with noisy dependencies turned down.
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];
    let noisy: &[(&str, &str)] = &[
        ("hyper", "warn"),
        ("hyper_util", "warn"),
        ("reqwest", "warn"),
        ("rusqlite", "warn"),
    ];
    for (target, lvl) in noisy {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Console logging on stderr, so JSON written to stdout stays parseable.
pub fn init_logging(level: &str, verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        level
    };

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level)?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
