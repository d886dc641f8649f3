//! Tracing subscriber setup.
//!
//! Modules log through the `log` macros; spans come from `tracing`. The
//! `tracing-log` bridge routes both through one subscriber.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initializes logging with the `RUST_LOG` filter, defaulting to info
/// for this crate.
pub fn init() {
    init_with_filter("campaigner=info");
}

/// Initializes logging with an explicit default filter, still overridable
/// through `RUST_LOG`. Safe to call more than once; later calls are no-ops.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
