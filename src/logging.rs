//! Structured logging setup
//!
//! The library only emits `tracing` events:
//! - `trace`: every `set`
//! - `debug`: derivations, recorded rows, declared fields
//! - `warn`: rejected records
//!
//! Binaries and tests opt in to output with [`init`].

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "observation_log=info";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_DIRECTIVE`].
///
/// Returns `false` if a global subscriber was already installed.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
