//! `facade.toml` parsing.
//!
//! The project file only supplies defaults; command-line flags and the
//! environment override it. A missing file is the same as an empty one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{ResolverOptions, ResolverOptionsBuilder};
use crate::constants::{CONFIG_FILE, DEFAULT_LOCKFILE, DEFAULT_PACKAGE_FILE};
use crate::core::FacadeError;
use crate::lockfile::LockGraph;
use crate::manifest::PackageDescriptor;

/// Parse a TOML file into any deserializable type.
///
/// # Errors
///
/// [`FacadeError::ConfigError`] naming the file when it cannot be read or
/// does not match `T`.
///
/// ```rust,no_run
/// use facade_cli::config::{ProjectConfig, parse_config};
/// use std::path::Path;
///
/// let config: ProjectConfig = parse_config(Path::new("facade.toml"))?;
/// println!("{} hosts", config.hosts.len());
/// # Ok::<(), facade_cli::core::FacadeError>(())
/// ```
pub fn parse_config<T>(path: &Path) -> Result<T, FacadeError>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path).map_err(|e| FacadeError::ConfigError {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&content).map_err(|e| FacadeError::ConfigError {
        message: format!("Failed to parse config file {}: {}", path.display(), e.message()),
    })
}

/// Contents of `facade.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Shrinkwrap file, relative to the project root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockfile: Option<PathBuf>,

    /// Package descriptor, relative to the project root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PathBuf>,

    /// Hash manifest root; defaults to the project root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_root: Option<PathBuf>,

    /// References whose hash manifests are preloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facades: Option<Vec<String>>,

    /// Base URL for `href`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hybrid_link_root: Option<String>,

    /// CDN hosts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    /// Hash-based host selection for the loader path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_sharding: Option<bool>,

    /// Content-hash cache-busting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_busting: Option<bool>,

    /// Tags meaning "any installed version".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wildcard_tags: Option<Vec<String>>,

    /// Static extension substitutions.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

impl ProjectConfig {
    /// Load `facade.toml` from `cwd`, or the explicit `path` if given.
    ///
    /// # Errors
    ///
    /// [`FacadeError::ConfigError`] when an explicit path does not exist or
    /// any file found is malformed.
    pub fn discover(cwd: &Path, path: Option<&Path>) -> Result<Self, FacadeError> {
        if let Some(path) = path {
            let path = if path.is_absolute() { path.to_path_buf() } else { cwd.join(path) };
            if !path.is_file() {
                return Err(FacadeError::ConfigError {
                    message: format!("Config file not found: {}", path.display()),
                });
            }
            return parse_config(&path);
        }

        let default = cwd.join(CONFIG_FILE);
        if default.is_file() {
            tracing::debug!("Using project config {}", default.display());
            parse_config(&default)
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, cwd.display());
            Ok(Self::default())
        }
    }

    /// Shrinkwrap location under `cwd`.
    #[must_use]
    pub fn lockfile_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(self.lockfile.as_deref().unwrap_or(Path::new(DEFAULT_LOCKFILE)))
    }

    /// Package descriptor location under `cwd`.
    #[must_use]
    pub fn package_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(self.package.as_deref().unwrap_or(Path::new(DEFAULT_PACKAGE_FILE)))
    }

    /// Load the project's inputs and prefill an options builder.
    ///
    /// Reads the lock graph and package descriptor. The returned builder can
    /// still be adjusted before [`ResolverOptionsBuilder::build`].
    ///
    /// # Errors
    ///
    /// Lock graph and package descriptor load errors.
    pub fn into_builder(
        self,
        cwd: &Path,
        template_path: &Path,
    ) -> Result<ResolverOptionsBuilder, FacadeError> {
        let lock_graph = LockGraph::load(&self.lockfile_path(cwd))?;
        let pkg = PackageDescriptor::load(&self.package_path(cwd))?;

        let mut builder = ResolverOptions::builder()
            .pkg(pkg)
            .lock_graph(Arc::new(lock_graph))
            .cwd(cwd)
            .template_path(template_path)
            .deployment_root(self.deployment_root.unwrap_or_else(|| cwd.to_path_buf()))
            .hosts(self.hosts)
            .extension_map(self.extensions);

        if let Some(facades) = self.facades {
            builder = builder.facades(facades);
        }
        if let Some(root) = self.hybrid_link_root {
            builder = builder.hybrid_link_root(root);
        }
        if let Some(enabled) = self.hash_sharding {
            builder = builder.hash_sharding(enabled);
        }
        if let Some(enabled) = self.cache_busting {
            builder = builder.cache_busting(enabled);
        }
        if let Some(tags) = self.wildcard_tags {
            builder = builder.wildcard_tags(tags);
        }
        Ok(builder)
    }

    /// [`ProjectConfig::into_builder`] followed by a build.
    ///
    /// # Errors
    ///
    /// Load errors and [`FacadeError::MissingRequiredOption`].
    pub fn into_options(self, cwd: &Path, template_path: &Path) -> Result<ResolverOptions, FacadeError> {
        self.into_builder(cwd, template_path)?.build()
    }
}
