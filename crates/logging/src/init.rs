//! crates/logging/src/init.rs
//! Subscriber installation.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::Verbosity;

/// Installs a formatting subscriber filtered by `verbosity`.
///
/// `RUST_LOG`, when set, takes precedence over the verbosity directive.
/// Calling this more than once is harmless; later calls are ignored.
///
/// # Example
///
/// ```rust,ignore
/// logging::init_tracing(logging::Verbosity::from_level(2));
/// ```
pub fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    init_tracing_with_filter(filter);
}

/// Installs a formatting subscriber with a caller-supplied filter.
pub fn init_tracing_with_filter(filter: EnvFilter) {
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
