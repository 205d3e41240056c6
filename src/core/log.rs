use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Default filter when `RUST_LOG` is unset. Warnings are kept so a failed
/// bootstrap fetch is visible even without `--verbose`.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "settlefee=debug,reqwest=info"
    } else {
        "settlefee=warn"
    }
}

/// Logs go to stderr; stdout is reserved for command output.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .without_time(),
        )
        .with(env_filter)
        .init();
}
