//! Shared test setup: one tracing subscriber for every test in a binary.

use std::sync::Once;

use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Install a test-captured subscriber honouring `RUST_LOG` (default `debug`).
/// Safe to call from every test; only the first call does anything.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter);

        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            info!("test setup complete");
        }
    });
}
