//! Diagnostic logging setup.
//!
//! Terminal messages for the operator go through `ui::messages`; everything
//! here is structured `tracing` output on stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when neither `RUST_LOG` nor `-v` say otherwise.
pub const DEFAULT_FILTER: &str = "warn";

fn filter_for(verbosity: u8, fallback: &str) -> EnvFilter {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return from_env;
    }
    let directive = match verbosity {
        0 => fallback,
        1 => "vattend=info",
        2 => "vattend=debug",
        _ => "trace",
    };
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: u8, fallback: &str) {
    let _ = tracing_subscriber::registry()
        .with(filter_for(verbosity, fallback))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init();
}
