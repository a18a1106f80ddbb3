// Diagnostic logging setup. Reports go to stdout; logs go to stderr.
use tracing_subscriber::EnvFilter;

/// Default filter: warnings only, or debug output for this crate with `-v`.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,http_load_test=debug"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the default filter. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
