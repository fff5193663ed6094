//! Logging setup helper
//!
//! Embedding binaries call `init()` once at startup; library code only uses
//! `tracing` macros and stays agnostic about the subscriber.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`)
///
/// Safe to call when a subscriber is already installed; the second install
/// attempt is ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
