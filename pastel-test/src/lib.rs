//! Shared test setup for the pastel workspace.

use lazy_static::lazy_static;
use tracing_subscriber::EnvFilter;

lazy_static! {
    static ref TRACING: () = {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    };
}

/// Initialize tracing for a test. Idempotent within a test binary.
///
/// Call at the start of every test so that `RUST_LOG`-filtered output is
/// available when a test fails.
pub fn init() {
    lazy_static::initialize(&TRACING);
}
