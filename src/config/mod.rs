//! Configuration for a resolution session.
//!
//! A session is configured by [`ResolverOptions`], normally assembled with
//! [`ResolverOptions::builder`]. The CLI fills a builder from the project's
//! `facade.toml` ([`ProjectConfig`]) and command-line overrides.
//!
//! # Project Configuration (`facade.toml`)
//!
//! ```toml
//! lockfile = "shrinkwrap.json"
//! package = "package.json"
//! deployment_root = "dist"
//! facades = ["app", "lib@^1.0.0"]
//! hybrid_link_root = "https://example.com/"
//! hosts = ["s1.cdn.example.com", "s2.cdn.example.com"]
//! hash_sharding = true
//! cache_busting = false
//! wildcard_tags = ["*", "latest"]
//!
//! [extensions]
//! less = ".css"
//! ```
//!
//! Every key is optional. Paths are relative to the project root.
//!
//! # Environment
//!
//! `FACADE_CACHE_BUSTING` (`1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`)
//! overrides `cache_busting` from any other source.

mod parser;

pub use parser::{ProjectConfig, parse_config};

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::constants::{CACHE_BUSTING_ENV, DEFAULT_WILDCARD_TAGS};
use crate::core::FacadeError;
use crate::lockfile::LockGraph;
use crate::manifest::PackageDescriptor;

/// Everything a [`crate::resolver::DirectiveResolver`] session needs.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// The project whose template is being compiled.
    pub pkg: PackageDescriptor,

    /// Lock graph rooted at the project.
    pub lock_graph: Arc<LockGraph>,

    /// Project root.
    pub cwd: PathBuf,

    /// Template being compiled, absolute or relative to `cwd`.
    pub template_path: PathBuf,

    /// Directory holding `<name>/<version>/md5.json` hash manifests.
    pub deployment_root: PathBuf,

    /// References whose hash manifests are loaded up front.
    pub facades: Vec<String>,

    /// Base URL for `href`, without trailing slashes.
    pub hybrid_link_root: Option<String>,

    /// CDN hosts; sharding is enabled when non-empty.
    pub hosts: Vec<String>,

    /// Static file extension substitutions (`less → .css`).
    pub extension_map: BTreeMap<String, String>,

    /// Use hash-based host selection for the loader configuration path.
    pub hash_sharding_enabled: bool,

    /// Rewrite asset names with their content hashes.
    pub cache_busting: bool,

    /// Range strings that mean "any installed version".
    pub wildcard_tags: Vec<String>,
}

impl ResolverOptions {
    /// Start building options.
    #[must_use]
    pub fn builder() -> ResolverOptionsBuilder {
        ResolverOptionsBuilder::default()
    }
}

/// Builder for [`ResolverOptions`].
///
/// # Examples
///
/// ```rust
/// use facade_cli::config::ResolverOptions;
/// use facade_cli::lockfile::LockGraph;
/// use facade_cli::manifest::PackageDescriptor;
///
/// let options = ResolverOptions::builder()
///     .pkg(PackageDescriptor::new("app", "0.2.0"))
///     .lock_graph(LockGraph::root("app", "0.2.0"))
///     .cwd("/work/app")
///     .template_path("/work/app/index.html")
///     .deployment_root("/work/app/dist")
///     .hybrid_link_root("https://example.com//")
///     .build()?;
///
/// assert_eq!(options.facades, vec!["app".to_string()]);
/// assert_eq!(options.hybrid_link_root.as_deref(), Some("https://example.com"));
/// assert!(options.hash_sharding_enabled);
/// # Ok::<(), facade_cli::core::FacadeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolverOptionsBuilder {
    pkg: Option<PackageDescriptor>,
    lock_graph: Option<Arc<LockGraph>>,
    cwd: Option<PathBuf>,
    template_path: Option<PathBuf>,
    deployment_root: Option<PathBuf>,
    facades: Option<Vec<String>>,
    hybrid_link_root: Option<String>,
    hosts: Vec<String>,
    extension_map: BTreeMap<String, String>,
    hash_sharding_enabled: Option<bool>,
    cache_busting: Option<bool>,
    wildcard_tags: Option<Vec<String>>,
}

impl ResolverOptionsBuilder {
    /// Set the project descriptor.
    #[must_use]
    pub fn pkg(mut self, pkg: PackageDescriptor) -> Self {
        self.pkg = Some(pkg);
        self
    }

    /// Set the lock graph.
    #[must_use]
    pub fn lock_graph(mut self, graph: impl Into<Arc<LockGraph>>) -> Self {
        self.lock_graph = Some(graph.into());
        self
    }

    /// Set the project root.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set the template being compiled.
    #[must_use]
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Set the deployment root.
    #[must_use]
    pub fn deployment_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.deployment_root = Some(path.into());
        self
    }

    /// Replace the facade list.
    #[must_use]
    pub fn facades<I, S>(mut self, facades: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facades = Some(facades.into_iter().map(Into::into).collect());
        self
    }

    /// Set the `href` link root.
    #[must_use]
    pub fn hybrid_link_root(mut self, root: impl Into<String>) -> Self {
        self.hybrid_link_root = Some(root.into());
        self
    }

    /// Replace the CDN host list.
    #[must_use]
    pub fn hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Add one static extension substitution.
    #[must_use]
    pub fn extension(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.extension_map.insert(from.into(), to.into());
        self
    }

    /// Add several static extension substitutions.
    #[must_use]
    pub fn extension_map(mut self, map: BTreeMap<String, String>) -> Self {
        self.extension_map.extend(map);
        self
    }

    /// Enable or disable hash-based host selection.
    #[must_use]
    pub fn hash_sharding(mut self, enabled: bool) -> Self {
        self.hash_sharding_enabled = Some(enabled);
        self
    }

    /// Enable or disable cache-busting. `FACADE_CACHE_BUSTING` still wins.
    #[must_use]
    pub fn cache_busting(mut self, enabled: bool) -> Self {
        self.cache_busting = Some(enabled);
        self
    }

    /// Replace the wildcard tags.
    #[must_use]
    pub fn wildcard_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wildcard_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`FacadeError::MissingRequiredOption`] naming the first missing or
    /// empty required option.
    pub fn build(self) -> Result<ResolverOptions, FacadeError> {
        let missing = |option: &str| FacadeError::MissingRequiredOption {
            option: option.to_string(),
        };

        let pkg = self.pkg.filter(|p| !p.name.trim().is_empty()).ok_or_else(|| missing("pkg"))?;
        let lock_graph = self.lock_graph.ok_or_else(|| missing("lock_graph"))?;
        let cwd = non_empty(self.cwd).ok_or_else(|| missing("cwd"))?;
        let template_path = non_empty(self.template_path).ok_or_else(|| missing("template_path"))?;
        let deployment_root =
            non_empty(self.deployment_root).ok_or_else(|| missing("deployment_root"))?;
        let deployment_root = if deployment_root.is_absolute() {
            deployment_root
        } else {
            cwd.join(deployment_root)
        };

        let hybrid_link_root = self
            .hybrid_link_root
            .map(|root| root.trim().trim_end_matches('/').to_string())
            .filter(|root| !root.is_empty());

        let cache_busting =
            cache_busting_from_env().or(self.cache_busting).unwrap_or_default();

        let wildcard_tags = self
            .wildcard_tags
            .filter(|tags| !tags.is_empty())
            .unwrap_or_else(|| DEFAULT_WILDCARD_TAGS.iter().map(ToString::to_string).collect());

        Ok(ResolverOptions {
            facades: self.facades.unwrap_or_else(|| vec![pkg.name.clone()]),
            pkg,
            lock_graph,
            cwd,
            template_path,
            deployment_root,
            hybrid_link_root,
            hosts: self.hosts,
            extension_map: self.extension_map,
            hash_sharding_enabled: self.hash_sharding_enabled.unwrap_or(true),
            cache_busting,
            wildcard_tags,
        })
    }
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Read the cache-busting toggle from `FACADE_CACHE_BUSTING`.
///
/// Unset or unrecognized values yield `None`.
#[must_use]
pub fn cache_busting_from_env() -> Option<bool> {
    let value = std::env::var(CACHE_BUSTING_ENV).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        other => {
            tracing::warn!("Ignoring unrecognized {}={:?}", CACHE_BUSTING_ENV, other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn complete() -> ResolverOptionsBuilder {
        ResolverOptions::builder()
            .pkg(PackageDescriptor::new("app", "0.2.0"))
            .lock_graph(LockGraph::root("app", "0.2.0"))
            .cwd("/work/app")
            .template_path("views/index.html")
            .deployment_root("dist")
    }

    #[test]
    #[serial]
    fn test_defaults() {
        let options = complete().build().unwrap();
        assert_eq!(options.facades, vec!["app"]);
        assert_eq!(options.wildcard_tags, vec!["*", "latest"]);
        assert_eq!(options.deployment_root, PathBuf::from("/work/app/dist"));
        assert!(options.hash_sharding_enabled);
        assert!(!options.cache_busting);
        assert!(options.hosts.is_empty());
        assert!(options.hybrid_link_root.is_none());
    }

    #[test]
    fn test_missing_required_options() {
        let cases = [
            (ResolverOptions::builder(), "pkg"),
            (complete().pkg(PackageDescriptor::default()), "pkg"),
            (
                ResolverOptions::builder().pkg(PackageDescriptor::new("app", "0.2.0")),
                "lock_graph",
            ),
            (complete().cwd(""), "cwd"),
            (complete().template_path(""), "template_path"),
            (complete().deployment_root(""), "deployment_root"),
        ];
        for (builder, expected) in cases {
            match builder.build() {
                Err(FacadeError::MissingRequiredOption { option }) => assert_eq!(option, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_link_root_trailing_slashes() {
        let options = complete().hybrid_link_root("https://example.com///").build().unwrap();
        assert_eq!(options.hybrid_link_root.as_deref(), Some("https://example.com"));

        let options = complete().hybrid_link_root("/").build().unwrap();
        assert_eq!(options.hybrid_link_root, None);
    }

    #[test]
    #[serial]
    fn test_env_overrides_cache_busting() {
        // SAFETY: serialized with every other test touching the environment.
        unsafe { std::env::set_var(CACHE_BUSTING_ENV, "on") };
        let on = complete().cache_busting(false).build().unwrap();
        unsafe { std::env::set_var(CACHE_BUSTING_ENV, "0") };
        let off = complete().cache_busting(true).build().unwrap();
        unsafe { std::env::set_var(CACHE_BUSTING_ENV, "maybe") };
        let fallback = complete().cache_busting(true).build().unwrap();
        unsafe { std::env::remove_var(CACHE_BUSTING_ENV) };

        assert!(on.cache_busting);
        assert!(!off.cache_busting);
        assert!(fallback.cache_busting);
    }
}
