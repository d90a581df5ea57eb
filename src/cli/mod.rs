//! Command-line interface for facade.
//!
//! The binary is a thin front end over the library: every subcommand loads
//! the project (`facade.toml`, shrinkwrap, package descriptor), builds one
//! [`DirectiveResolver`](crate::resolver::DirectiveResolver) session and
//! prints what it produces.
//!
//! # Commands
//!
//! - `render`: render a template file with every directive available
//! - `resolve`: run a single directive and print its output
//! - `versions`: print the installed-version index
//!
//! # Examples
//!
//! ```bash
//! facade render views/index.html -o dist/index.html
//! facade render index.html --host s1.cdn.com --host s2.cdn.com
//! facade resolve modfile bar/x.js --template views/index.html
//! facade versions --format json
//! facade -C ../other-project versions bar
//! ```
//!
//! # Logging
//!
//! Logs go to stderr. `--verbose` selects `debug`, `--quiet` selects `error`;
//! without either, `RUST_LOG` is honored and the default is `warn`.

pub mod render;
pub mod resolve;
pub mod versions;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{ProjectConfig, ResolverOptionsBuilder};

/// Runtime settings derived from the global flags.
///
/// Separate from [`Cli`] so commands can be driven from tests without
/// parsing arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Explicit log level; `None` defers to `RUST_LOG`.
    pub log_level: Option<String>,
    /// Suppress informational output.
    pub quiet: bool,
    /// `--config` path, relative to `cwd` unless absolute.
    pub config_path: Option<PathBuf>,
    /// Project root every relative path is resolved against.
    pub cwd: PathBuf,
}

impl CliConfig {
    /// Settings for a project rooted at `cwd`.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            log_level: None,
            quiet: false,
            config_path: None,
            cwd: cwd.into(),
        }
    }

    /// `path` made absolute against the project root.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() { path.to_path_buf() } else { self.cwd.join(path) }
    }

    /// Read the project config.
    ///
    /// # Errors
    ///
    /// A missing explicit `--config` file or a malformed one.
    pub fn project_config(&self) -> Result<ProjectConfig> {
        let config = ProjectConfig::discover(&self.cwd, self.config_path.as_deref())?;
        Ok(config)
    }

    /// Options builder for a session compiling `template`.
    ///
    /// # Errors
    ///
    /// Config, shrinkwrap and package descriptor load failures.
    pub fn options_builder(&self, template: &Path) -> Result<ResolverOptionsBuilder> {
        let builder = self.project_config()?.into_builder(&self.cwd, template)?;
        Ok(builder)
    }
}

/// Install the stderr subscriber.
///
/// An explicit `level` wins over `RUST_LOG`. Calling twice is harmless.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolve versioned module references in page templates.
#[derive(Parser, Debug)]
#[command(
    name = "facade",
    about = "Resolve versioned module references in page templates",
    version,
    long_about = "facade renders page templates whose directives (facade, modfile, combo, static, href, ...) \
                  resolve module references against the project's shrinkwrap into concrete, \
                  optionally hashed and host-sharded asset URLs."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output.
    ///
    /// Equivalent to `RUST_LOG=debug`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Project config file (defaults to `facade.toml` in the project root).
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run as if started in DIR.
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template file.
    Render(render::RenderCommand),

    /// Resolve a single directive and print the result.
    Resolve(resolve::ResolveCommand),

    /// Print the installed-version index.
    Versions(versions::VersionsCommand),
}

impl Cli {
    /// Set up logging and run the selected command.
    ///
    /// # Errors
    ///
    /// Whatever the command fails with; `main` turns it into a
    /// user-facing message.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config()?;
        init_logging(config.log_level.as_deref());
        self.execute_with_config(&config)
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// # Errors
    ///
    /// When the process working directory cannot be read.
    pub fn build_config(&self) -> Result<CliConfig> {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        let current = std::env::current_dir().context("Failed to read the working directory")?;
        let cwd = match &self.cwd {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => current.join(dir),
            None => current,
        };

        Ok(CliConfig {
            log_level,
            quiet: self.quiet,
            config_path: self.config.clone(),
            cwd,
        })
    }

    /// Run the selected command with prepared settings.
    ///
    /// # Errors
    ///
    /// Whatever the command fails with.
    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Commands::Render(cmd) => cmd.execute(config),
            Commands::Resolve(cmd) => cmd.execute(config),
            Commands::Versions(cmd) => cmd.execute(config),
        }
    }
}
