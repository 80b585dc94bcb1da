//! Structured logging for the Tellus workspace.
//!
//! Provides span-based, filterable logging via the `tracing` ecosystem:
//! console output with uptime timestamps and module paths, filtered through
//! `RUST_LOG` when set.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `default_filter` is used when `RUST_LOG` is unset; when it is `None` the
/// filter falls back to `info`. Calling this more than once is a no-op —
/// the first subscriber wins.
pub fn init_logging(default_filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or("info")));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

/// The filter used when neither `RUST_LOG` nor a caller default applies.
#[must_use]
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_enables_info() {
        let filter = default_env_filter();
        assert!(format!("{filter}").contains("info"));
    }

    #[test]
    fn test_init_logging_is_reentrant() {
        init_logging(Some("debug"));
        init_logging(Some("debug"));
    }
}
