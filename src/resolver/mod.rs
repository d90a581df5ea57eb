//! Directive resolution.
//!
//! A [`DirectiveResolver`] is one resolution session: one template compiled
//! against one project. It owns everything the directives need (the lock
//! graph, the precomputed module root, flattened content hashes and the CDN
//! host list) and exposes one method per directive.
//!
//! # Directives
//!
//! | Directive | Method | Output |
//! |---|---|---|
//! | `facade` | [`DirectiveResolver::facade`] | bootstrap block (first call only) + entry script |
//! | `modfile` | [`DirectiveResolver::modfile`] | URL of one module file |
//! | `combo` | [`DirectiveResolver::combo`] | URL of a `/concat/` bundle |
//! | `static` | [`DirectiveResolver::static_file`] | URL of a same-project static file |
//! | `href` | [`DirectiveResolver::href`] | link under the hybrid link root |
//! | `version` | [`DirectiveResolver::version`] | project version |
//! | `timestamp` | [`DirectiveResolver::timestamp`] | epoch milliseconds |
//! | `timestr` | [`DirectiveResolver::timestr`] | local time `YYYY-MM-DD HH:MM:SS` |
//!
//! # Package References
//!
//! `facade`, `modfile` and `combo` take references of the form
//! `name[@version|range][/path]` and resolve them like this:
//!
//! 1. No argument means the project itself.
//! 2. A reference to the project is pinned to the project's own version.
//! 3. An exact version is used as-is.
//! 4. Anything else is resolved as a range (default `*`) against the versions
//!    installed in the lock graph; the highest match wins.
//! 5. A sub-path without an extension gets `.js`.
//!
//! # Output Paths
//!
//! With CDN hosts configured, asset directives produce protocol-relative
//! URLs on the first host. Without hosts they produce paths relative to the
//! template, climbing to the deployment root through the module root
//! computed at construction.
//!
//! # Example
//!
//! ```rust
//! use facade_cli::config::ResolverOptions;
//! use facade_cli::lockfile::LockGraph;
//! use facade_cli::manifest::PackageDescriptor;
//! use facade_cli::resolver::DirectiveResolver;
//!
//! let graph = LockGraph::root("foo", "0.2.0").with_dependency("bar", LockGraph::node("1.0.0"));
//! let options = ResolverOptions::builder()
//!     .pkg(PackageDescriptor::new("foo", "0.2.0"))
//!     .lock_graph(graph)
//!     .cwd("/work/foo")
//!     .template_path("/work/foo/index.html")
//!     .deployment_root("/work/foo/dist")
//!     .build()?;
//! let resolver = DirectiveResolver::new(options)?;
//!
//! assert_eq!(resolver.modfile(Some("bar/x.js"))?, "../../bar/1.0.0/x.js");
//! assert_eq!(resolver.module_id(None)?, "foo@0.2.0");
//! # Ok::<(), facade_cli::core::FacadeError>(())
//! ```

pub mod bootstrap;
pub mod hash_rewriter;
pub mod host_sharder;
pub mod package_ref;
pub mod path_builder;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::config::ResolverOptions;
use crate::constants::{
    COMBO_JOINER, COMBO_PREFIX, COMBO_SEPARATOR, DEFAULT_MODULE_EXTENSION, TIMESTR_FORMAT,
};
use crate::core::FacadeError;
use crate::lockfile::LockGraph;
use crate::lockfile::hash_manifest::HashManifest;
use crate::manifest::PackageDescriptor;
use crate::utils::paths::split_extension;
use crate::utils::security::check_within_project;
use crate::version::{RangeResolver, VersionIndex};

use bootstrap::LoaderConfig;
use hash_rewriter::HashRewriter;
use host_sharder::HostSharder;
use package_ref::{PackageRef, VersionSelector};
use path_builder::PathBuilder;

/// A fully determined package file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Package name.
    pub name: String,

    /// Exact version.
    pub version: String,

    /// In-package sub-path; empty for the package entry file.
    pub file_path: String,
}

impl fmt::Display for ResolvedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)?;
        if !self.file_path.is_empty() {
            write!(f, "/{}", self.file_path)?;
        }
        Ok(())
    }
}

/// One template's resolution session.
///
/// The session is `Send + Sync`, so template engine callbacks can share it
/// through an [`Arc`].
#[derive(Debug)]
pub struct DirectiveResolver {
    pkg: PackageDescriptor,
    lock_graph: Arc<LockGraph>,
    paths: PathBuilder,
    hashes: HashRewriter,
    hosts: HostSharder,
    hybrid_link_root: Option<String>,
    hash_sharding_enabled: bool,
    wildcard_tags: Vec<String>,
    facade_emitted: AtomicBool,
    version_index: OnceLock<VersionIndex>,
}

impl DirectiveResolver {
    /// Start a session.
    ///
    /// Computes the module root, resolves every declared facade and, when
    /// cache-busting is on, loads their hash manifests. This is the only
    /// place a session touches the filesystem.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::ConfigError`] when the template is outside the project
    /// - any resolution error of a declared facade
    pub fn new(options: ResolverOptions) -> Result<Self, FacadeError> {
        let ResolverOptions {
            pkg,
            lock_graph,
            cwd,
            template_path,
            deployment_root,
            facades,
            hybrid_link_root,
            hosts,
            extension_map,
            hash_sharding_enabled,
            cache_busting,
            wildcard_tags,
        } = options;

        let paths = PathBuilder::for_template(&cwd, &template_path, &extension_map)?;

        let mut resolver = Self {
            pkg,
            lock_graph,
            paths,
            hashes: HashRewriter::disabled(),
            hosts: HostSharder::new(hosts),
            hybrid_link_root,
            hash_sharding_enabled,
            wildcard_tags,
            facade_emitted: AtomicBool::new(false),
            version_index: OnceLock::new(),
        };

        let mut loaded = BTreeSet::new();
        for facade in &facades {
            match resolver.resolve_package(Some(facade.as_str())) {
                Ok(asset) => {
                    loaded.insert((asset.name, asset.version));
                }
                Err(e) if resolver.is_unversioned_self(facade) => {
                    tracing::warn!("Skipping hash manifest for '{}': {}", facade, e);
                }
                Err(e) => return Err(e.in_directive("facades", Some(facade.as_str()))),
            }
        }

        if cache_busting {
            let mut manifest = HashManifest::new();
            for (name, version) in &loaded {
                manifest.load_package(&deployment_root, name, version);
            }
            resolver.hashes = HashRewriter::new(true, &manifest, &resolver.paths);
        }

        tracing::debug!(
            "Session for {} (template {}, module root '{}')",
            resolver.pkg.name,
            template_path.display(),
            resolver.paths.module_root()
        );
        Ok(resolver)
    }

    fn is_unversioned_self(&self, reference: &str) -> bool {
        self.pkg.version().is_none() && PackageRef::parse(reference).name == self.pkg.name
    }

    /// The project descriptor.
    #[must_use]
    pub fn package(&self) -> &PackageDescriptor {
        &self.pkg
    }

    /// The session's path builder.
    #[must_use]
    pub fn paths(&self) -> &PathBuilder {
        &self.paths
    }

    /// Whether [`DirectiveResolver::facade`] has already emitted the
    /// bootstrap block. Renders through a template renderer track their own.
    #[must_use]
    pub fn facade_emitted(&self) -> bool {
        self.facade_emitted.load(Ordering::SeqCst)
    }

    /// Installed versions of every package, built on first use.
    pub fn version_index(&self) -> &VersionIndex {
        self.version_index.get_or_init(|| VersionIndex::build(&self.lock_graph))
    }

    /// Resolve a package reference to a concrete file.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::ModuleNotFound`], [`FacadeError::RangeInvalid`] or
    ///   [`FacadeError::NoSatisfyingVersion`] from range resolution
    /// - [`FacadeError::PathEscapesProject`] when the sub-path leaves the package
    pub fn resolve_package(&self, reference: Option<&str>) -> Result<ResolvedAsset, FacadeError> {
        let mut package = match argument(reference) {
            Some(reference) => PackageRef::parse(reference),
            None => PackageRef::named(self.pkg.name.clone()),
        };

        if package.name == self.pkg.name {
            if let Some(version) = self.pkg.version() {
                package.selector = VersionSelector::Version(version.to_string());
            }
        }

        let file_path = if package.path.is_empty() {
            String::new()
        } else {
            check_within_project(&package.path)?
        };

        let asset = match package.selector {
            VersionSelector::Version(version) => ResolvedAsset {
                name: package.name,
                version,
                file_path,
            },
            selector => {
                let range = match &selector {
                    VersionSelector::Range(range) => range.as_str(),
                    _ => self.wildcard_tags.first().map_or("*", String::as_str),
                };
                let version = RangeResolver::new(self.version_index(), &self.wildcard_tags)
                    .resolve(&package.name, range)?;
                ResolvedAsset {
                    name: package.name,
                    version,
                    file_path: with_default_extension(file_path),
                }
            }
        };

        tracing::debug!("Resolved {:?} to {}", reference, asset);
        Ok(asset)
    }

    /// The `name@version[/path]` identifier of a package reference.
    ///
    /// # Errors
    ///
    /// As [`DirectiveResolver::resolve_package`].
    pub fn module_id(&self, reference: Option<&str>) -> Result<String, FacadeError> {
        Ok(self.resolve_package(reference)?.to_string())
    }

    /// `facade` directive, with the bootstrap block tracked by the session.
    ///
    /// # Errors
    ///
    /// Resolution errors, wrapped in [`FacadeError::DirectiveFailed`].
    pub fn facade(&self, reference: Option<&str>) -> Result<String, FacadeError> {
        self.facade_with(&self.facade_emitted, reference)
    }

    /// `facade` directive, with the bootstrap block tracked by `emitted`.
    ///
    /// The block is prepended when `emitted` is still unset, and the flag is
    /// set only once the whole output has been built. Renderers pass a flag
    /// scoped to one render so every rendered page gets its own loader.
    ///
    /// # Errors
    ///
    /// Resolution errors, wrapped in [`FacadeError::DirectiveFailed`].
    pub fn facade_with(
        &self,
        emitted: &AtomicBool,
        reference: Option<&str>,
    ) -> Result<String, FacadeError> {
        self.facade_inner(emitted, reference).map_err(|e| e.in_directive("facade", reference))
    }

    fn facade_inner(&self, emitted: &AtomicBool, reference: Option<&str>) -> Result<String, FacadeError> {
        let id = self.module_id(reference)?;
        let entry = bootstrap::entry_script(&id)?;
        if emitted.load(Ordering::SeqCst) {
            return Ok(entry);
        }

        let block = self.bootstrap()?;
        if emitted.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok() {
            Ok(block + &entry)
        } else {
            Ok(entry)
        }
    }

    /// The session's own bootstrap flag.
    pub(crate) fn session_bootstrap_flag(&self) -> &AtomicBool {
        &self.facade_emitted
    }

    /// `modfile` directive.
    ///
    /// # Errors
    ///
    /// Resolution errors, wrapped in [`FacadeError::DirectiveFailed`].
    pub fn modfile(&self, reference: Option<&str>) -> Result<String, FacadeError> {
        self.resolve_package(reference)
            .map(|asset| self.asset_url(&self.module_path(&asset)))
            .map_err(|e| e.in_directive("modfile", reference))
    }

    /// `combo` directive.
    ///
    /// # Errors
    ///
    /// Resolution and project-boundary errors of any entry, wrapped in
    /// [`FacadeError::DirectiveFailed`].
    pub fn combo(&self, list: Option<&str>) -> Result<String, FacadeError> {
        self.combo_inner(list).map_err(|e| e.in_directive("combo", list))
    }

    fn combo_inner(&self, list: Option<&str>) -> Result<String, FacadeError> {
        let Some(list) = argument(list) else {
            return Ok(String::new());
        };

        let mut entries = Vec::new();
        for entry in list.split(COMBO_JOINER).map(str::trim).filter(|e| !e.is_empty()) {
            let absolute = if entry.starts_with('.') {
                self.project_static_path(entry)?
            } else {
                self.module_path(&self.resolve_package(Some(entry))?)
            };
            entries.push(absolute.replace('/', COMBO_SEPARATOR));
        }

        if entries.is_empty() {
            return Ok(String::new());
        }

        let combined = format!("{COMBO_PREFIX}{}", entries.join(COMBO_JOINER));
        Ok(self.asset_url(&combined))
    }

    /// `static` directive.
    ///
    /// # Errors
    ///
    /// [`FacadeError::MissingDirectiveArgument`] without a title and
    /// [`FacadeError::PathEscapesProject`] for titles leaving the project,
    /// wrapped in [`FacadeError::DirectiveFailed`].
    pub fn static_file(&self, title: Option<&str>) -> Result<String, FacadeError> {
        self.static_inner(title).map_err(|e| e.in_directive("static", title))
    }

    fn static_inner(&self, title: Option<&str>) -> Result<String, FacadeError> {
        let title = argument(title).ok_or_else(|| FacadeError::MissingDirectiveArgument {
            directive: "static".to_string(),
        })?;

        let static_path = self.paths.static_path(title);
        if static_path.starts_with('/') {
            return Ok(self.hosts.shard(&self.hashes.rewrite(&static_path), false));
        }

        let absolute = self.project_static_path(title)?;
        if self.hosts.is_enabled() {
            return Ok(self.hosts.shard(&self.hashes.rewrite(&absolute), false));
        }
        Ok(match self.hashes.hash_for(&absolute) {
            Some(hash) => hash_rewriter::apply(&static_path, hash),
            None => static_path,
        })
    }

    /// `href` directive.
    ///
    /// # Errors
    ///
    /// [`FacadeError::MissingDirectiveArgument`] without a title and
    /// [`FacadeError::PathEscapesProject`] for relative titles leaving the
    /// project, wrapped in [`FacadeError::DirectiveFailed`].
    pub fn href(&self, title: Option<&str>) -> Result<String, FacadeError> {
        self.href_inner(title).map_err(|e| e.in_directive("href", title))
    }

    fn href_inner(&self, title: Option<&str>) -> Result<String, FacadeError> {
        let title = argument(title).ok_or_else(|| FacadeError::MissingDirectiveArgument {
            directive: "href".to_string(),
        })?;

        let Some(root) = &self.hybrid_link_root else {
            return Ok(title.to_string());
        };

        let target = if title.starts_with('.') {
            check_within_project(&self.paths.resolve_from_template(title))?
        } else {
            title.trim_start_matches('/').to_string()
        };
        Ok(format!("{root}/{}/{target}", self.pkg.name))
    }

    /// `version` directive: the project version, or `""`.
    #[must_use]
    pub fn version(&self) -> String {
        self.pkg.version().unwrap_or_default().to_string()
    }

    /// `timestamp` directive: milliseconds since the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// `timestr` directive: local wall-clock time.
    #[must_use]
    pub fn timestr(&self) -> String {
        chrono::Local::now().format(TIMESTR_FORMAT).to_string()
    }

    fn module_path(&self, asset: &ResolvedAsset) -> String {
        self.paths.module_path(&asset.name, &asset.version, &asset.file_path)
    }

    /// Absolute deployment path of a same-project static title, after the
    /// project boundary check.
    fn project_static_path(&self, title: &str) -> Result<String, FacadeError> {
        check_within_project(&self.paths.resolve_from_template(title))?;
        let project = self.resolve_package(None)?;
        Ok(self.paths.project_static_path(&project.name, &project.version, title))
    }

    /// Hash rewrite, then the first host or a template-relative path.
    fn asset_url(&self, absolute_path: &str) -> String {
        let hashed = self.hashes.rewrite(absolute_path);
        if self.hosts.is_enabled() {
            self.hosts.shard(&hashed, false)
        } else {
            self.paths.to_relative(&hashed)
        }
    }

    fn bootstrap(&self) -> Result<String, FacadeError> {
        let mut output = String::new();

        for (name, engine) in &self.lock_graph.engines {
            let Some(version) = engine.version.as_deref().filter(|v| !v.is_empty()) else {
                tracing::warn!("Engine '{}' has no version in the lock graph, skipped", name);
                continue;
            };
            let path = self.paths.module_path(name, version, "");
            output.push_str(&bootstrap::engine_script(&self.asset_url(&path)));
        }

        let path = if self.hosts.is_enabled() {
            self.hosts.shard("/", self.hash_sharding_enabled).trim_end_matches('/').to_string()
        } else {
            self.paths.module_root().to_string()
        };
        let config = LoaderConfig {
            path,
            graph: self.lock_graph.dependency_map(),
            hosts: self.hosts.is_enabled().then(|| self.hosts.hosts().to_vec()),
        };
        output.push_str(&bootstrap::config_script(&config)?);

        tracing::debug!("Emitted bootstrap block for {}", self.pkg.name);
        Ok(output)
    }
}

/// Treat blank arguments as absent.
fn argument(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn with_default_extension(file_path: String) -> String {
    if file_path.is_empty() || !split_extension(&file_path).1.is_empty() {
        file_path
    } else {
        format!("{file_path}{DEFAULT_MODULE_EXTENSION}")
    }
}
