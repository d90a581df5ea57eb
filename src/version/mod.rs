//! Installed-version index and range resolution.
//!
//! The [`VersionIndex`] flattens the lock graph into `package → installed
//! versions`; [`resolver::RangeResolver`] picks the best installed version
//! for a range from that index.
//!
//! # Examples
//!
//! ```rust
//! use facade_cli::lockfile::LockGraph;
//! use facade_cli::version::VersionIndex;
//!
//! let graph = LockGraph::root("app", "0.2.0")
//!     .with_dependency("bar", LockGraph::node("1.0.0"));
//! let index = VersionIndex::build(&graph);
//!
//! assert!(index.contains("bar"));
//! assert!(index.versions("bar").unwrap().contains("1.0.0"));
//! ```

pub mod constraints;
pub mod resolver;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::lockfile::LockGraph;

pub use constraints::RangeSpec;
pub use resolver::RangeResolver;

/// Package name → set of installed version strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionIndex {
    versions: BTreeMap<String, BTreeSet<String>>,
}

impl VersionIndex {
    /// Build the index from a lock graph in one traversal.
    ///
    /// Dependencies and engines are both indexed. When an engine is also
    /// reached as a regular dependency at a different version the mismatch is
    /// logged, since the two declarations are expected to agree.
    #[must_use]
    pub fn build(graph: &LockGraph) -> Self {
        let mut index = Self::default();
        graph.walk_dependencies(|name, node| index.record(name, node));

        let mut engines = Self::default();
        graph.walk_engines(|name, node| engines.record(name, node));

        for (name, engine_versions) in &engines.versions {
            if let Some(dep_versions) = index.versions.get(name) {
                if engine_versions.is_disjoint(dep_versions) {
                    tracing::warn!(
                        "Engine '{}' is declared at {:?} but the dependency tree installs {:?}",
                        name,
                        engine_versions,
                        dep_versions
                    );
                }
            }
        }
        for (name, engine_versions) in engines.versions {
            index.versions.entry(name).or_default().extend(engine_versions);
        }

        tracing::debug!("Indexed {} packages from the lock graph", index.len());
        index
    }

    fn record(&mut self, name: &str, node: &LockGraph) {
        if let Some(version) = node.version.as_deref().filter(|v| !v.is_empty()) {
            self.versions.entry(name.to_string()).or_default().insert(version.to_string());
        }
    }

    /// Installed versions of `name`.
    #[must_use]
    pub fn versions(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.versions.get(name)
    }

    /// Whether `name` has at least one installed version.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.versions.contains_key(name)
    }

    /// Indexed package names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// `(name, versions)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.versions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of indexed packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
