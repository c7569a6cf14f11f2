//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for the process.
///
/// `RUST_LOG` wins when set; the fallback keeps third-party noise at
/// `info` while the opsledger crates log at `debug` (the suppressed-batch
/// diagnostics in the clearance service live there). Emits JSON lines
/// with the emitting crate as target. Calling this more than once is a
/// no-op, so tests can call it freely.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,opsledger_clearance=debug,opsledger_infra=debug")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(true)
        .try_init();
}
