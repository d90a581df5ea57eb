//! Content-hash cache-busting.
//!
//! Hash manifests are flattened once into `absolute deployment path → hash`
//! so a directive only needs a map lookup. Rewriting is a pure string
//! transform: `/bar/1.0.0/x.js` with hash `abc` becomes `/bar/1.0.0/x_abc.js`.

use std::collections::HashMap;

use super::path_builder::PathBuilder;
use crate::lockfile::hash_manifest::{HashManifest, split_key};
use crate::utils::paths::split_extension;

/// Inserts known content hashes into asset file names.
#[derive(Debug, Clone, Default)]
pub struct HashRewriter {
    enabled: bool,
    hashes: HashMap<String, String>,
}

impl HashRewriter {
    /// Flatten `manifest` using the deployment layout of `paths`.
    #[must_use]
    pub fn new(enabled: bool, manifest: &HashManifest, paths: &PathBuilder) -> Self {
        let mut hashes = HashMap::new();
        for (key, files) in manifest.iter() {
            let Some((name, version)) = split_key(key) else {
                tracing::warn!("Ignoring hash manifest entry with malformed key '{}'", key);
                continue;
            };
            for (file, hash) in files {
                hashes.insert(paths.module_path(name, version, file), hash.clone());
            }
        }

        tracing::debug!(
            "Cache-busting {} with {} known hashes",
            if enabled { "enabled" } else { "disabled" },
            hashes.len()
        );
        Self { enabled, hashes }
    }

    /// A rewriter that never changes anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether rewriting is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The hash recorded for `absolute_path`, if rewriting is enabled.
    #[must_use]
    pub fn hash_for(&self, absolute_path: &str) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.hashes.get(absolute_path).map(String::as_str)
    }

    /// Rewrite `absolute_path` with its hash, or return it unchanged.
    #[must_use]
    pub fn rewrite(&self, absolute_path: &str) -> String {
        match self.hash_for(absolute_path) {
            Some(hash) => apply(absolute_path, hash),
            None => absolute_path.to_string(),
        }
    }
}

/// Insert `_<hash>` before the extension of the final path segment.
///
/// ```rust
/// use facade_cli::resolver::hash_rewriter::apply;
///
/// assert_eq!(apply("/a/b.min.css", "f00"), "/a/b.min_f00.css");
/// assert_eq!(apply("/a/LICENSE", "f00"), "/a/LICENSE_f00");
/// ```
#[must_use]
pub fn apply(path: &str, hash: &str) -> String {
    let (stem, extension) = split_extension(path);
    format!("{stem}_{hash}{extension}")
}
