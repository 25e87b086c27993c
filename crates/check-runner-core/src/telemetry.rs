//! Log setup for the `check-runner` binary.
//!
//! Everything is written to stderr; stdout is reserved for the status line
//! read by the scheduler.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` overrides `level`; `json`
/// switches to one JSON object per line. Later calls are no-ops.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry.with(stderr_layer.json()).try_init().ok();
    } else {
        registry.with(stderr_layer).try_init().ok();
    }
}

/// Default level for a run: `DEBUG` when the debug flag is set, `INFO` otherwise.
pub fn level_for(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}
