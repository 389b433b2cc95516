use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const FALLBACK_FILTER: &str = "warn";

/// Parses `filter`, falling back to `warn` with a note on stderr.
pub fn build_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("aotrt: invalid log filter {filter:?}: {err}; using {FALLBACK_FILTER}");
        EnvFilter::new(FALLBACK_FILTER)
    })
}

/// Installs the stderr subscriber. Returns `false` if a global subscriber
/// already exists (for instance a host application's).
pub fn init(filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(build_filter(filter))
        .try_init()
        .is_ok()
}
