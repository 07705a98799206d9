//! Structured logging setup.
//!
//! Diagnostics go through `tracing` to stderr so stdout stays reserved for
//! results and server responses.

use std::env;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an `EnvFilter` directive, e.g. `dlsweep=debug`.
pub const LOG_ENV: &str = "DLSWEEP_LOG";

/// Level used when `DLSWEEP_LOG` is unset: `warn`, `info` with `-v`,
/// `debug` with `-vv` or more.
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global subscriber. Logs go to stderr; stdout carries results.
///
/// Calling this more than once is harmless: later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}
