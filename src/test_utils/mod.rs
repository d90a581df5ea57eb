//! Test utilities for facade
//!
//! Fixtures for lock graphs and package descriptors, temporary project
//! layouts, and test logging.
//!
//! # Example
//!
//! ```rust,no_run
//! use facade_cli::test_utils::{LockGraphFixture, ProjectFixture};
//!
//! # fn example() -> anyhow::Result<()> {
//! let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic())?;
//! project.add_file("index.html", "{{ modfile(id=\"bar/x.js\") }}")?;
//! let resolver = project.resolver("index.html")?;
//! assert_eq!(resolver.modfile(Some("bar/x.js"))?, "../../bar/1.0.0/x.js");
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod project;

pub use fixtures::{LockGraphFixture, PackageFixture};
pub use project::ProjectFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays
/// off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=facade_cli=debug cargo test
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
            .with_ansi(true)
            .try_init();
    });
}
