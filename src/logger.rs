use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for the given verbosity flags.
///
/// `verbose` wins over `quiet`; with neither, `RUST_LOG` is honored before
/// falling back to info level.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("depscan=debug")
    } else if quiet {
        EnvFilter::new("depscan=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depscan=info"))
    }
}

/// Install the global subscriber. Logs go to stderr; stdout carries reports
/// and the MCP transport.
pub fn init_logger(verbose: bool, quiet: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_quiet() {
        assert_eq!(filter_for(true, true).to_string(), "depscan=debug");
        assert_eq!(filter_for(false, true).to_string(), "depscan=error");
    }
}
