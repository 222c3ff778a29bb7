#![deny(missing_docs)]

//! # Logging
//!
//! Installs the `tracing` subscriber used by the binary. Logs go to stderr so
//! stdout only ever carries the JSON result.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global subscriber. `RUST_LOG` overrides the defaults.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "parammap=debug,parammap_core=debug,info"
    } else {
        "parammap=info,parammap_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // `try_init` so repeated initialization in tests is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
