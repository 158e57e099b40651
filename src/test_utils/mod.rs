//! Test utilities for cnab-deps
//!
//! Shared by unit tests and the integration suite (through the `test-utils`
//! feature):
//! - [`init_test_logging`] - once-only tracing setup that plays well with the test harness
//! - [`BundleFixture`] - builder for bundle documents
//!
//! # Example
//!
//! ```rust,no_run
//! use cnab_deps::test_utils::BundleFixture;
//!
//! let bundle = BundleFixture::new("myapp")
//!     .sequence(&["db"])
//!     .requires("db", "example.com/db:1.0")
//!     .build();
//! ```

pub mod fixtures;

pub use fixtures::BundleFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`. With neither, logging stays
/// off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=cnab_deps=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
