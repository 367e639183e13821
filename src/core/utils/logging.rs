use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialise a global logger at info level (overridable via `RUST_LOG`).
///
/// Safe to call from multiple tests; only the first call installs the
/// subscriber.
pub fn global_info_logger() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    });
}
