//! Loading the lock graph from disk.

use std::fs;
use std::path::Path;

use super::LockGraph;
use crate::core::FacadeError;

impl LockGraph {
    /// Load a shrinkwrap file.
    ///
    /// Unlike hash manifests, the lock graph is a required input: a missing
    /// or malformed file is an error.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::LockfileNotFound`] when `path` does not exist
    /// - [`FacadeError::LockfileParseError`] when the JSON is malformed or
    ///   nests deeper than [`MAX_GRAPH_DEPTH`](crate::constants::MAX_GRAPH_DEPTH)
    /// - [`FacadeError::IoError`] for other read failures
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use facade_cli::lockfile::LockGraph;
    /// use std::path::Path;
    ///
    /// let graph = LockGraph::load(Path::new("shrinkwrap.json"))?;
    /// println!("{} direct dependencies", graph.dependencies.len());
    /// # Ok::<(), facade_cli::core::FacadeError>(())
    /// ```
    pub fn load(path: &Path) -> Result<Self, FacadeError> {
        if !path.exists() {
            return Err(FacadeError::LockfileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let graph: Self =
            serde_json::from_str(&content).map_err(|e| FacadeError::LockfileParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            "Loaded lock graph {} ({} direct dependencies, {} engines)",
            path.display(),
            graph.dependencies.len(),
            graph.engines.len()
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_GRAPH_DEPTH;
    use tempfile::TempDir;

    /// Shrinkwrap whose single chain of dependencies reaches `depth`.
    fn chain_shrinkwrap(depth: usize) -> String {
        let mut node = r#"{"version":"1.0.0"}"#.to_string();
        for _ in 1..depth {
            node = format!(r#"{{"version":"1.0.0","dependencies":{{"d":{node}}}}}"#);
        }
        format!(r#"{{"name":"app","version":"0.1.0","dependencies":{{"d":{node}}}}}"#)
    }

    #[test]
    fn test_load_valid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shrinkwrap.json");
        fs::write(
            &path,
            r#"{"name":"app","version":"1.0.0","dependencies":{"bar":{"version":"1.0.0"}}}"#,
        )
        .unwrap();

        let graph = LockGraph::load(&path).unwrap();
        assert_eq!(graph.version.as_deref(), Some("1.0.0"));
        assert!(graph.dependencies.contains_key("bar"));
    }

    #[test]
    fn test_load_missing() {
        let temp = TempDir::new().unwrap();
        let result = LockGraph::load(&temp.path().join("missing.json"));
        assert!(matches!(result, Err(FacadeError::LockfileNotFound { .. })));
    }

    #[test]
    fn test_load_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shrinkwrap.json");
        fs::write(&path, "{ not json").unwrap();

        let result = LockGraph::load(&path);
        assert!(matches!(result, Err(FacadeError::LockfileParseError { .. })));
    }

    #[test]
    fn test_load_deepest_expressible_graph() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shrinkwrap.json");
        fs::write(&path, chain_shrinkwrap(MAX_GRAPH_DEPTH)).unwrap();

        let graph = LockGraph::load(&path).unwrap();
        let mut visited = 0;
        graph.walk_dependencies(|_, _| visited += 1);
        assert_eq!(visited, MAX_GRAPH_DEPTH + 1);
    }

    #[test]
    fn test_load_rejects_deeper_graph() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shrinkwrap.json");
        fs::write(&path, chain_shrinkwrap(MAX_GRAPH_DEPTH + 1)).unwrap();

        let result = LockGraph::load(&path);
        assert!(matches!(result, Err(FacadeError::LockfileParseError { .. })));
    }
}
