//! Integration test suite for facade
//!
//! End-to-end tests that run the `facade` binary against temporary projects.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render**: `facade render` with every directive, flags and config
//! - **resolve**: `facade resolve` for single directives
//! - **versions**: `facade versions` text and JSON output
//! - **errors**: exit codes and error reports

use assert_cmd::Command;
use facade_cli::constants::CACHE_BUSTING_ENV;
use facade_cli::test_utils::ProjectFixture;

mod errors;
mod render;
mod resolve;
mod versions;

/// `facade` running in `project`, with a clean environment for the variables
/// facade reads.
pub fn facade_cmd(project: &ProjectFixture) -> Command {
    let mut cmd = Command::cargo_bin("facade").unwrap();
    cmd.current_dir(project.path())
        .env_remove(CACHE_BUSTING_ENV)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}
