//! AWS-facing half of the probes: configuration, per-service flow
//! implementations, and the Lambda echo handler. The service-agnostic flow
//! contract lives in `probe_core`.

pub mod config;
pub mod echo;
pub mod poll;
pub mod report;
pub mod runners;

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber every probe binary starts with.
/// Honors `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
