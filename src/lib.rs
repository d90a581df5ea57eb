//! facade - module reference resolver for versioned asset templates
//!
//! Page templates in a package-managed front-end project refer to modules
//! loosely (`bar`, `lib@^1.0.0/b.js`, `./a.css`). facade resolves those
//! references against the project's shrinkwrap and turns them into concrete
//! asset URLs: versioned paths relative to the template, optionally rewritten
//! with content hashes and spread across asset hosts. The `facade` directive
//! additionally emits the loader bootstrap (engine scripts and a
//! configuration block with the dependency graph) once per page.
//!
//! # Architecture Overview
//!
//! One compile of one template is a *session*:
//!
//! 1. [`config`] turns `facade.toml`, the shrinkwrap and the package
//!    descriptor into [`config::ResolverOptions`]
//! 2. [`resolver::DirectiveResolver`] is built from the options; it computes
//!    the module root, resolves declared facades and loads hash manifests
//! 3. [`templating::TemplateRenderer`] exposes the directives as template
//!    functions and renders
//!
//! # Core Modules
//!
//! - [`cli`] - `facade render`, `facade resolve`, `facade versions`
//! - [`config`] - session options, builder and `facade.toml`
//! - [`core`] - error types and user-facing error display
//! - [`lockfile`] - shrinkwrap lock graph and hash manifests
//! - [`manifest`] - the project's package descriptor
//! - [`resolver`] - directive resolution, paths, hashes and host sharding
//! - [`templating`] - Tera integration
//! - [`utils`] - path normalization and the project boundary check
//! - [`version`] - installed-version index and range resolution
//!
//! # Example
//!
//! ```rust
//! use facade_cli::config::ResolverOptions;
//! use facade_cli::lockfile::LockGraph;
//! use facade_cli::manifest::PackageDescriptor;
//! use facade_cli::resolver::DirectiveResolver;
//!
//! # fn example() -> anyhow::Result<()> {
//! let graph = LockGraph::root("foo", "0.2.0")
//!     .with_dependency("bar", LockGraph::node("1.0.0"));
//! let options = ResolverOptions::builder()
//!     .pkg(PackageDescriptor::new("foo", "0.2.0"))
//!     .lock_graph(graph)
//!     .cwd("/work/foo")
//!     .template_path("/work/foo/index.html")
//!     .deployment_root("/work/foo")
//!     .build()?;
//!
//! let resolver = DirectiveResolver::new(options)?;
//! assert_eq!(resolver.modfile(Some("bar/x.js"))?, "../../bar/1.0.0/x.js");
//! assert_eq!(resolver.module_id(Some("bar@^1.0.0"))?, "bar@1.0.0");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod lockfile;
pub mod manifest;
pub mod resolver;
pub mod templating;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
