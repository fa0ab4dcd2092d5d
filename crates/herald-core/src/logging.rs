//! Tracing subscriber setup for binaries embedding the pipeline
//!
//! The library itself only emits `tracing` events; installing a
//! subscriber is up to the application.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "herald=info";

const VERBOSE_FILTER: &str = "herald=debug,info";

/// Install a global subscriber with an `EnvFilter` and a compact or JSON
/// fmt layer
///
/// `RUST_LOG` overrides the built-in filter. Fails if a global subscriber
/// is already installed.
pub fn init_tracing(verbose: bool, json: bool) -> Result<(), TryInitError> {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .json()
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .try_init()
    }
}
