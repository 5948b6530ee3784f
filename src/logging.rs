//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Library code emits `tracing` events; only the binary installs a
//! subscriber. Diagnostics go to stderr so stdout stays reserved for the
//! command output produced by [`output`](crate::output).
//!
//! # Log Levels
//!
//! - `warn` (default): nothing unless something is off
//! - `info` (`-v`): documents created, thumbnails attached, export summary
//! - `debug` (`-vv`): per-file detail, skipped and removed thumbnails
//! - `trace` (`-vvv`): everything
//!
//! `RUST_LOG` overrides the verbosity flag when set.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Map a `-v` count to a level.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Build the filter: `RUST_LOG` if set, otherwise this crate at `level` and
/// dependencies at warn.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!("warn,item_world_db={level}"))
    })
}

/// Install the global subscriber. Call once, at startup.
pub fn init_logging(verbosity: u8) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(build_env_filter(level_for_verbosity(verbosity)))
        .with(layer)
        .init();
}
