//! Dependency lock graph (shrinkwrap) model.
//!
//! The lock graph records the exact version of every installed package and
//! its transitive dependencies. It is read once per session and never
//! mutated. The root node describes the current project.
//!
//! # Format
//!
//! ```json
//! {
//!   "name": "app",
//!   "version": "0.2.0",
//!   "dependencies": {
//!     "bar": { "from": "bar@^1.0.0", "version": "1.0.0" },
//!     "baz": {
//!       "version": "2.1.0",
//!       "dependencies": { "bar": { "version": "0.9.1" } }
//!     }
//!   },
//!   "engines": {
//!     "neuron": { "from": "neuron@*", "version": "4.2.0" }
//!   }
//! }
//! ```
//!
//! Child nodes are named by their key in the parent's `dependencies` or
//! `engines` map; only the root carries an explicit `name`.

pub mod hash_manifest;
mod io;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::MAX_GRAPH_DEPTH;

/// One node of the lock graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockGraph {
    /// Package name; present on the root, implied by the map key elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Exact installed version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// The spec this node was installed from (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Direct dependencies keyed by package name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, LockGraph>,

    /// Runtime engines the loader needs on the page, keyed by package name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub engines: BTreeMap<String, LockGraph>,
}

impl LockGraph {
    /// Create a root node for a project.
    #[must_use]
    pub fn root(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            ..Self::default()
        }
    }

    /// Create an unnamed child node at a version.
    #[must_use]
    pub fn node(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::default()
        }
    }

    /// Builder-style helper adding a dependency.
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>, node: LockGraph) -> Self {
        self.dependencies.insert(name.into(), node);
        self
    }

    /// Builder-style helper adding an engine.
    #[must_use]
    pub fn with_engine(mut self, name: impl Into<String>, node: LockGraph) -> Self {
        self.engines.insert(name.into(), node);
        self
    }

    /// Visit the root and every transitive dependency as `(name, node)`.
    ///
    /// Engines are not visited; see [`LockGraph::walk_engines`]. The root is
    /// visited only when it carries a name.
    pub fn walk_dependencies<'a>(&'a self, visit: impl FnMut(&'a str, &'a LockGraph)) {
        let mut roots = Vec::new();
        if let Some(name) = self.name.as_deref() {
            roots.push((name, self, 0));
        } else {
            roots.extend(self.dependencies.iter().map(|(n, node)| (n.as_str(), node, 1)));
        }
        walk(roots, visit);
    }

    /// Visit every engine declared on the root, and their own dependencies.
    pub fn walk_engines<'a>(&'a self, visit: impl FnMut(&'a str, &'a LockGraph)) {
        walk(self.engines.iter().map(|(n, node)| (n.as_str(), node, 1)).collect(), visit);
    }

    /// Flatten the graph into `name@version → {dependency → version}`.
    ///
    /// This is the structured payload the client loader receives in its
    /// configuration block. Nodes without a version are skipped.
    #[must_use]
    pub fn dependency_map(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut graph = BTreeMap::new();
        let mut collect = |name: &str, node: &LockGraph| {
            let Some(version) = node.version.as_deref() else {
                return;
            };
            let deps = node
                .dependencies
                .iter()
                .filter_map(|(dep, child)| Some((dep.clone(), child.version.clone()?)))
                .collect();
            graph.insert(format!("{name}@{version}"), deps);
        };
        self.walk_dependencies(&mut collect);
        self.walk_engines(&mut collect);
        graph
    }
}

/// Iterative depth-first traversal with a depth cap.
fn walk<'a>(
    mut stack: Vec<(&'a str, &'a LockGraph, usize)>,
    mut visit: impl FnMut(&'a str, &'a LockGraph),
) {
    while let Some((name, node, depth)) = stack.pop() {
        if depth > MAX_GRAPH_DEPTH {
            tracing::warn!(
                "Lock graph deeper than {} levels at '{}', skipping the remainder",
                MAX_GRAPH_DEPTH,
                name
            );
            continue;
        }
        tracing::trace!("lock graph node {}@{:?} (depth {})", name, node.version, depth);
        visit(name, node);
        stack.extend(node.dependencies.iter().map(|(n, child)| (n.as_str(), child, depth + 1)));
    }
}
