//! Diagnostic logging for the binary.
//!
//! The library only emits `tracing` events; this module installs the
//! subscriber. Output goes to stderr so reports on stdout stay clean.
//!
//! Level priority: `RUST_LOG` > `--debug` > `info`.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor `--debug` is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Builds the level filter.
pub fn filter(debug_flag: bool) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    }
}

/// Installs the global subscriber.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init(debug_flag: bool) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(debug_flag))
        .with_writer(std::io::stderr)
        .with_target(debug_flag)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialised");
    }
}
