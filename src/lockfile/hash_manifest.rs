//! Precomputed content hash manifests.
//!
//! The build step writes `<deployment_root>/<name>/<version>/md5.json`, a flat
//! JSON object of `filename → hash`. facade never computes hashes; it only
//! reads these files, and any failure to do so means "no hash data" for that
//! package rather than an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::constants::HASH_MANIFEST_FILE;

/// Hashes for every loaded package, keyed by `"<name>@<version>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashManifest {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl HashManifest {
    /// Empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the file hashes of one package version.
    pub fn insert(
        &mut self,
        name: &str,
        version: &str,
        files: impl IntoIterator<Item = (String, String)>,
    ) {
        self.entries.entry(format!("{name}@{version}")).or_default().extend(files);
    }

    /// Load the manifest of `name@version` from the deployment root and merge it.
    ///
    /// Returns whether anything was loaded. Missing or malformed files are
    /// logged and skipped.
    pub fn load_package(&mut self, deployment_root: &Path, name: &str, version: &str) -> bool {
        let path = deployment_root.join(name).join(version).join(HASH_MANIFEST_FILE);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    "No hash manifest for {}@{} at {}: {}; cache-busting skipped",
                    name,
                    version,
                    path.display(),
                    e
                );
                return false;
            }
        };

        match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(files) => {
                tracing::debug!("Loaded {} hashes for {}@{}", files.len(), name, version);
                self.insert(name, version, files);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Malformed hash manifest {}: {}; cache-busting skipped for {}@{}",
                    path.display(),
                    e,
                    name,
                    version
                );
                false
            }
        }
    }

    /// Iterate `(name@version, files)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether no package has hash data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split a `"<name>@<version>"` key. Scoped names keep their leading `@`.
#[must_use]
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    let at = key.rfind('@').filter(|&i| i > 0)?;
    Some((&key[..at], &key[at + 1..]))
}
