//! ## catmouse-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! Eater threads are named (`cat-3`, `mouse-0`), so thread names are part of
//! every line. `RUST_LOG` wins over the configured filter.

use std::time::Duration;

use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use catmouse_core::Species;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. A second call is a no-op.
    pub fn init(default_filter: &str) {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let installed = fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .with_span_events(FmtSpan::NONE)
            .try_init();
        if installed.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    }

    #[inline]
    pub fn log_meal(species: Species, creature: usize, bowl: usize, waited: Duration) {
        let span = info_span!("meal", %species, creature, bowl);
        let _entered = span.enter();
        tracing::debug!(waited_us = waited.as_micros() as u64, "started eating");
    }

    #[inline]
    pub fn log_violation(message: &str) {
        tracing::error!(violation = message, "exclusion violated");
    }
}
