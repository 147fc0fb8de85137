//! Tracing subscriber setup
//!
//! The SDK only emits `tracing` events; installing a subscriber is the
//! application's call. These helpers cover the common case: an `EnvFilter`
//! honoring `RUST_LOG` (default `info`) with text or JSON output.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Output format for [`try_init_tracing`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Install a global subscriber.
///
/// # Errors
/// Returns [`TryInitError`] if a global subscriber is already installed
pub fn try_init_tracing(format: LogFormat) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    }
}

/// Install a text subscriber, ignoring an already-installed one.
pub fn init_tracing() {
    if try_init_tracing(LogFormat::Text).is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        // Whichever call runs first in this process wins; later ones fail.
        let _ = try_init_tracing(LogFormat::Json);
        assert!(try_init_tracing(LogFormat::Text).is_err());
        init_tracing();
    }

    #[test]
    fn test_default_format_is_text() {
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }
}
