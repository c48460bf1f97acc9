//! Tracing subscriber setup for the `tally` binary.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TALLY_LOG";

/// Filter used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "tally=info";

/// Installs the global tracing subscriber.
///
/// Reads per-module levels from `TALLY_LOG`, e.g.
/// `TALLY_LOG=tally_core::pipeline=debug,tally_core::frame=warn`; the
/// `tally` prefix covers both the library and the binary. Logs go to
/// standard error so CSV written to standard output stays clean.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
